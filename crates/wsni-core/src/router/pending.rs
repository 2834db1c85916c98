//! Pending redirects: token -> original URL, single-shot.

use std::collections::HashMap;

use crate::token::Token;

#[derive(Debug, Default, Clone)]
pub struct PendingTable {
    entries: HashMap<Token, String>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `original_url` under `token`. Returns false (and stores nothing)
    /// when the token is already live.
    pub fn insert(&mut self, token: Token, original_url: &str) -> bool {
        if self.entries.contains_key(&token) {
            return false;
        }
        self.entries.insert(token, original_url.to_string());
        true
    }

    /// Store `original_url` under `token`, replacing any live entry.
    pub fn replace(&mut self, token: Token, original_url: &str) -> Option<String> {
        self.entries.insert(token, original_url.to_string())
    }

    /// Remove and return the entry; a token restores at most once.
    pub fn take(&mut self, token: &Token) -> Option<String> {
        self.entries.remove(token)
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Token {
        Token::parse(s, s.len()).unwrap()
    }

    #[test]
    fn take_is_single_shot() {
        let mut table = PendingTable::new();
        assert!(table.insert(tok("1234"), "https://en.wikipedia.org/wiki/Foo"));
        assert!(table.contains(&tok("1234")));
        assert_eq!(
            table.take(&tok("1234")).as_deref(),
            Some("https://en.wikipedia.org/wiki/Foo")
        );
        assert_eq!(table.take(&tok("1234")), None);
        assert!(table.is_empty());
    }

    #[test]
    fn insert_refuses_live_token() {
        let mut table = PendingTable::new();
        assert!(table.insert(tok("1"), "https://a/"));
        assert!(!table.insert(tok("1"), "https://b/"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.replace(tok("1"), "https://b/").as_deref(), Some("https://a/"));
        assert_eq!(table.take(&tok("1")).as_deref(), Some("https://b/"));
    }
}
