//! Stop code type.

use std::fmt;

/// Error returned when parsing an invalid stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop code: {reason}")]
pub struct InvalidStopCode {
    reason: &'static str,
}

/// A validated transit stop code.
///
/// Stop codes are 1 to 10 ASCII alphanumeric characters, stored uppercase.
/// This type guarantees that any `StopCode` value is valid by construction,
/// so it can be embedded in upstream query strings without further checks.
///
/// # Examples
///
/// ```
/// use bus_server::domain::StopCode;
///
/// let stop = StopCode::parse("308209").unwrap();
/// assert_eq!(stop.as_str(), "308209");
///
/// // Lowercase input is normalized
/// assert_eq!(StopCode::parse("mtA1").unwrap().as_str(), "MTA1");
///
/// // Empty and oversized codes are rejected
/// assert!(StopCode::parse("").is_err());
/// assert!(StopCode::parse("12345678901").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StopCode(String);

impl StopCode {
    /// Parse a stop code from a string.
    ///
    /// The input must be 1-10 ASCII alphanumeric characters; letters are
    /// uppercased.
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidStopCode {
                reason: "must not be empty",
            });
        }

        if s.len() > 10 {
            return Err(InvalidStopCode {
                reason: "must be at most 10 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStopCode {
                reason: "must be ASCII letters and digits only",
            });
        }

        Ok(StopCode(s.to_ascii_uppercase()))
    }

    /// Returns the stop code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
