pub mod config;
pub mod logging;

pub mod clock;
pub mod host;
pub mod landing;
pub mod router;
pub mod token;
