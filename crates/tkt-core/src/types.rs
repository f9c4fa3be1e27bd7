//! Party and classification codes for ticket interactions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for unknown sender or classification codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown code: {0}")]
pub struct UnknownCode(pub String);

/// The party that literally sent a message.
///
/// The vendor API tags every reply with a single-character sender code:
/// `C` for the customer, `A` for a support agent. No other codes are native
/// to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Customer,
    Support,
}

impl Party {
    /// Parses a vendor sender code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "C" => Some(Self::Customer),
            "A" => Some(Self::Support),
            _ => None,
        }
    }

    /// The vendor wire code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Customer => 'C',
            Self::Support => 'A',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Party {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode(s.to_string()))
    }
}

/// The bucket an interaction is currently assigned to.
///
/// Starts equal to the sending party (`Customer` for the synthetic creation
/// event) and may later be manually reassigned to `Bug` or `Ignored`. The
/// extra codes `B` and `I` only ever appear after such reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Customer,
    Support,
    Bug,
    Ignored,
}

impl Classification {
    /// Parses a classification code (`C`, `A`, `B`, or `I`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "C" => Some(Self::Customer),
            "A" => Some(Self::Support),
            "B" => Some(Self::Bug),
            "I" => Some(Self::Ignored),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Customer => 'C',
            Self::Support => 'A',
            Self::Bug => 'B',
            Self::Ignored => 'I',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Support => "support",
            Self::Bug => "bug",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Classification {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode(s.to_string()))
    }
}

impl From<Party> for Classification {
    fn from(party: Party) -> Self {
        match party {
            Party::Customer => Self::Customer,
            Party::Support => Self::Support,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_codes_roundtrip() {
        for party in [Party::Customer, Party::Support] {
            let parsed = Party::from_code(&party.code().to_string());
            assert_eq!(parsed, Some(party));
        }
    }

    #[test]
    fn party_rejects_unknown_codes() {
        assert_eq!(Party::from_code("B"), None);
        assert_eq!(Party::from_code(""), None);
        assert!("X".parse::<Party>().is_err());
    }

    #[test]
    fn classification_codes_roundtrip() {
        for classification in [
            Classification::Customer,
            Classification::Support,
            Classification::Bug,
            Classification::Ignored,
        ] {
            let parsed = Classification::from_code(&classification.code().to_string());
            assert_eq!(parsed, Some(classification));
        }
    }

    #[test]
    fn classification_rejects_unknown_codes() {
        let result: Result<Classification, _> = "Z".parse();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "unknown code: Z");
    }

    #[test]
    fn classification_from_party() {
        assert_eq!(
            Classification::from(Party::Customer),
            Classification::Customer
        );
        assert_eq!(
            Classification::from(Party::Support),
            Classification::Support
        );
    }

    #[test]
    fn codes_tolerate_surrounding_whitespace() {
        assert_eq!(Party::from_code(" C "), Some(Party::Customer));
        assert_eq!(Classification::from_code(" I "), Some(Classification::Ignored));
    }

    #[test]
    fn classification_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Classification::Bug).unwrap();
        assert_eq!(json, "\"bug\"");
        let parsed: Classification = serde_json::from_str("\"ignored\"").unwrap();
        assert_eq!(parsed, Classification::Ignored);
    }
}
