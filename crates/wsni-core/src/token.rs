//! Correlation tokens for pending redirects.
//!
//! A token is a fixed-length random decimal string. With 16 digits the
//! birthday bound puts the collision chance around 1 in 10^8, which is
//! accepted; tokens are not secrets and are not drawn from a CSPRNG on purpose.

use std::fmt;

use rand::Rng;

/// Decimal correlation token tying an intercepted URL to its restore request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Parse a token of exactly `digits` ASCII digits.
    pub fn parse(s: &str, digits: usize) -> Option<Self> {
        if s.len() == digits && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces fresh tokens of a given length.
pub trait TokenSource: Send {
    fn next_token(&mut self, digits: usize) -> Token;
}

/// Default source backed by the thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&mut self, digits: usize) -> Token {
        let mut rng = rand::thread_rng();
        let s: String = (0..digits)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Token(s)
    }
}

/// Deterministic source that replays a fixed list of raw values, then
/// falls back to a zero-padded counter.
#[derive(Debug, Default, Clone)]
pub struct SequenceTokens {
    queued: std::collections::VecDeque<String>,
    counter: u64,
}

impl SequenceTokens {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queued: values.into_iter().map(Into::into).collect(),
            counter: 0,
        }
    }
}

impl TokenSource for SequenceTokens {
    fn next_token(&mut self, digits: usize) -> Token {
        if let Some(v) = self.queued.pop_front() {
            return Token(v);
        }
        self.counter += 1;
        let s = format!("{:0>width$}", self.counter, width = digits);
        // Keep the rightmost digits when the counter outgrows the width.
        Token(s[s.len() - digits..].to_string())
    }
}
