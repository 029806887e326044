use std::fmt;

use crate::error::{Error, Result};

/// A byte pattern with wildcard support, in the conventional text form
/// `"48 8B C4 ?? 55"`. A match consumes exactly `len()` bytes; wildcard
/// tokens match any byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(Vec<Option<u8>>);

impl Pattern {
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        for token in text.split_whitespace() {
            if token == "??" || token == "?" {
                tokens.push(None);
                continue;
            }

            let value = u8::from_str_radix(token, 16).map_err(|e| {
                Error::InvalidPattern(format!("bad token '{}': {}", token, e))
            })?;
            tokens.push(Some(value));
        }

        if tokens.is_empty() {
            return Err(Error::InvalidPattern("pattern is empty".to_string()));
        }

        Ok(Self(tokens))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[Option<u8>] {
        &self.0
    }

    /// Whether the pattern matches at the start of `window`. The caller
    /// guarantees `window.len() >= self.len()`.
    pub(crate) fn matches_at(&self, window: &[u8]) -> bool {
        self.0
            .iter()
            .zip(window)
            .all(|(token, byte)| token.is_none_or(|value| value == *byte))
    }

    /// Position and value of the first literal token, if any token is
    /// literal at all. Used to skip the scan ahead with `memchr`.
    pub(crate) fn first_literal(&self) -> Option<(usize, u8)> {
        self.0
            .iter()
            .enumerate()
            .find_map(|(i, token)| token.map(|value| (i, value)))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                Some(value) => write!(f, "{:02X}", value)?,
                None => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_wildcards() {
        let pattern = Pattern::parse("48 8D 0D ?? ?? ?? ??").unwrap();
        assert_eq!(pattern.len(), 7);
        assert_eq!(pattern.tokens()[0], Some(0x48));
        assert_eq!(pattern.tokens()[1], Some(0x8D));
        assert_eq!(pattern.tokens()[2], Some(0x0D));
        assert_eq!(pattern.tokens()[3], None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Pattern::parse("").is_err());
        assert!(Pattern::parse("ZZ").is_err());
        assert!(Pattern::parse("48 8B QQ").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let pattern = Pattern::parse("44 38 25 ?? ?? ?? ??").unwrap();
        let formatted = pattern.to_string();
        assert_eq!(formatted, "44 38 25 ?? ?? ?? ??");
        assert_eq!(Pattern::parse(&formatted).unwrap(), pattern);
    }

    #[test]
    fn test_single_char_wildcard() {
        let pattern = Pattern::parse("55 ? 8B").unwrap();
        assert_eq!(pattern.tokens(), &[Some(0x55), None, Some(0x8B)]);
    }

    #[test]
    fn test_first_literal_skips_wildcards() {
        let pattern = Pattern::parse("?? ?? C4 55").unwrap();
        assert_eq!(pattern.first_literal(), Some((2, 0xC4)));

        let pattern = Pattern::parse("?? ??").unwrap();
        assert_eq!(pattern.first_literal(), None);
    }
}
