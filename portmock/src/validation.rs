//! Validation of request parameters.
//!
//! Path segments such as the `8500` in `/test/8500` or the `200` in
//! `/timeout/200` arrive as text. They are parsed here and checked against
//! the configured bounds before the registry or the idle supervisor ever sees
//! them. Out-of-bounds values are rejected, never clamped.

use std::fmt;

use crate::port::{Port, PortRange};

/// Why a request parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// The text is not a well-formed integer.
    Format,
    /// The integer lies outside the configured bounds.
    Range,
}

impl ValidationKind {
    /// Machine-readable reason reported in HTTP responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request parameter.
///
/// `note` is the human-readable diagnostic; for range failures it describes
/// the accepted bounds, e.g. `"< 5 or > 300"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The failure category.
    pub kind: ValidationKind,
    /// Human-readable diagnostic text.
    pub note: String,
}

impl ValidationError {
    fn format() -> Self {
        Self {
            kind: ValidationKind::Format,
            note: "invalid integer format".into(),
        }
    }

    fn range(min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Self {
            kind: ValidationKind::Range,
            note: format!("< {min} or > {max}"),
        }
    }

    /// Machine-readable reason, `"format"` or `"range"`.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.note)
    }
}

impl std::error::Error for ValidationError {}

/// Inclusive bounds for idle timeout durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutBounds {
    min: u64,
    max: u64,
}

impl TimeoutBounds {
    /// Creates new bounds. Callers validate `min <= max` beforehand; the
    /// configuration validator does so for every loaded config.
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Smallest accepted timeout.
    #[must_use]
    pub const fn min(&self) -> u64 {
        self.min
    }

    /// Largest accepted timeout.
    #[must_use]
    pub const fn max(&self) -> u64 {
        self.max
    }

    /// Returns `true` if `seconds` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, seconds: u64) -> bool {
        seconds >= self.min && seconds <= self.max
    }

    /// Checks an already-parsed duration against the bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationKind::Range`] error when out of bounds.
    pub fn check(&self, seconds: u64) -> Result<u64, ValidationError> {
        if self.contains(seconds) {
            Ok(seconds)
        } else {
            Err(ValidationError::range(self.min, self.max))
        }
    }
}

impl fmt::Display for TimeoutBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

fn parse_integer(text: &str) -> Result<i64, ValidationError> {
    text.parse::<i64>().map_err(|_| ValidationError::format())
}

/// Parses and range-checks a candidate port.
///
/// # Errors
///
/// Returns a `format` error if `text` is not an integer and a `range` error
/// if it falls outside `range`.
///
/// # Examples
///
/// ```
/// use portmock::{Port, PortRange};
/// use portmock::validation::{validate_port, ValidationKind};
///
/// let range = PortRange::new(
///     Port::try_from(8000).unwrap(),
///     Port::try_from(8999).unwrap(),
/// ).unwrap();
///
/// assert_eq!(validate_port("8500", &range).unwrap().value(), 8500);
/// assert_eq!(validate_port("abc", &range).unwrap_err().kind, ValidationKind::Format);
///
/// let err = validate_port("80", &range).unwrap_err();
/// assert_eq!(err.reason(), "range");
/// assert_eq!(err.note, "< 8000 or > 8999");
/// ```
pub fn validate_port(text: &str, range: &PortRange) -> Result<Port, ValidationError> {
    let value = parse_integer(text)?;
    if !range.contains_value(value) {
        return Err(ValidationError::range(range.min(), range.max()));
    }

    u16::try_from(value)
        .ok()
        .and_then(|raw| Port::try_from(raw).ok())
        .ok_or_else(|| ValidationError::range(range.min(), range.max()))
}

/// Parses and range-checks an idle timeout in seconds.
///
/// # Errors
///
/// Returns a `format` error if `text` is not an integer and a `range` error
/// if it falls outside `bounds`.
pub fn validate_timeout(text: &str, bounds: &TimeoutBounds) -> Result<u64, ValidationError> {
    let value = parse_integer(text)?;
    let seconds = u64::try_from(value).map_err(|_| ValidationError::range(bounds.min, bounds.max))?;
    bounds.check(seconds)
}
