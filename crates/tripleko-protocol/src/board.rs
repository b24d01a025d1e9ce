//! Board identifiers.
//!
//! A board id ends up inside the backend channel path and in page URLs, so
//! only ASCII letters and digits survive. Everything else is dropped, not
//! escaped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Keep only ASCII digits and letters, in their original order.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// A validated board identifier: non-empty, `[0-9A-Za-z]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardId(String);

impl BoardId {
    /// Strict parse: rejects any input that `sanitize` would change.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if raw.is_empty() || sanitize(raw) != raw {
            return Err(ProtocolError::InvalidBoardId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Lenient construction from user input (form fields, query params).
    ///
    /// Falls back to a fresh random id when nothing usable is left.
    pub fn from_input(raw: &str) -> Self {
        let cleaned = sanitize(raw);
        if cleaned.trim().is_empty() {
            Self::random()
        } else {
            Self(cleaned)
        }
    }

    /// 128 random bits as 32 lowercase hex digits.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Browser-facing page location for this board.
    pub fn page_path(&self) -> String {
        format!("/b/{}", self.0)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BoardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BoardId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BoardId> for String {
    fn from(id: BoardId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_everything_but_alphanumerics() {
        assert_eq!(sanitize("go-game_42!"), "gogame42");
        assert_eq!(sanitize("My Board!"), "MyBoard");
        assert_eq!(sanitize("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize("caf\u{e9} \u{1f600}x"), "cafx");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for input in ["", "abc", "a b/c?d=e", "\u{ff21}\u{ff22}9", "  \t\n", "__--!!"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn sanitize_output_is_ordered_subsequence() {
        let input = "x1-y2_z3 W4";
        let out = sanitize(input);
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric()));

        let mut rest = input.chars();
        for c in out.chars() {
            assert!(rest.any(|r| r == c), "{c} out of order");
        }
    }

    #[test]
    fn parse_accepts_clean_ids() {
        let id = BoardId::parse("abc123").unwrap();
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.page_path(), "/b/abc123");
    }

    #[test]
    fn parse_rejects_dirty_or_empty_ids() {
        assert!(BoardId::parse("go-game!").is_err());
        assert!(BoardId::parse("a b").is_err());
        assert!(BoardId::parse("").is_err());
    }

    #[test]
    fn from_input_sanitizes() {
        assert_eq!(BoardId::from_input("My Board!").as_str(), "MyBoard");
    }

    #[test]
    fn from_input_falls_back_to_random() {
        for input in ["", "   ", "!!!", "\u{4e2d}\u{6587}"] {
            let id = BoardId::from_input(input);
            assert_eq!(id.as_str().len(), 32);
            assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(BoardId::random(), BoardId::random());
    }

    #[test]
    fn serde_enforces_invariant() {
        let id: BoardId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert!(serde_json::from_str::<BoardId>("\"a/b\"").is_err());
    }
}
