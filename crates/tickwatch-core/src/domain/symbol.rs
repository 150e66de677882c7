use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker the watchlist accepts. Covers dotted share classes
/// (BRK.B) and hyphenated listings with room to spare.
const SYMBOL_MAX_LEN: usize = 15;

/// Ticker symbol as stored on the watchlist.
///
/// Raw add-form input is normalized exactly once on the way in (trim plus
/// uppercase), so two inputs differing only in case or surrounding
/// whitespace resolve to the same watchlist entry and every downstream
/// comparison is byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize and validate raw user input.
    ///
    /// Accepted shape: a leading ASCII letter followed by letters, digits,
    /// `.` or `-`, at most 15 characters after trimming.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let candidate = input.trim().to_ascii_uppercase();
        if candidate.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = candidate.chars().count();
        if len > SYMBOL_MAX_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: SYMBOL_MAX_LEN,
            });
        }

        for (index, ch) in candidate.chars().enumerate() {
            if index == 0 {
                if !ch.is_ascii_alphabetic() {
                    return Err(ValidationError::SymbolInvalidStart { ch });
                }
                continue;
            }
            if !is_ticker_char(ch) {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_ticker_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
