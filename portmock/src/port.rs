//! Port and port range types.
//!
//! Ports handed out by the registry are plain numbers; nothing here binds a
//! socket or checks whether the operating system agrees that a port is free.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod proptests;

/// A non-zero port number (1-65535).
///
/// # Examples
///
/// ```
/// use portmock::Port;
///
/// let port = Port::try_from(8080).unwrap();
/// assert_eq!(port.value(), 8080);
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// The minimum valid port number.
    pub const MIN: u16 = 1;

    /// The maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidPortError {
                value,
                reason: "port 0 is invalid".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The invalid port value.
    pub value: u16,
    /// The reason the port is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

/// An inclusive range of ports, the allocation domain of the registry.
///
/// # Examples
///
/// ```
/// use portmock::{Port, PortRange};
///
/// let range = PortRange::new(
///     Port::try_from(8000).unwrap(),
///     Port::try_from(8999).unwrap(),
/// ).unwrap();
///
/// assert_eq!(range.len(), 1000);
/// assert!(range.contains(Port::try_from(8500).unwrap()));
/// assert!(!range.contains(Port::try_from(7999).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    min: Port,
    max: Port,
}

impl PortRange {
    /// Creates a new port range.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is less than `min`.
    pub fn new(min: Port, max: Port) -> Result<Self, InvalidPortRangeError> {
        if max < min {
            Err(InvalidPortRangeError {
                min,
                max,
                reason: "max must be greater than or equal to min".into(),
            })
        } else {
            Ok(Self { min, max })
        }
    }

    /// Returns the minimum port in the range.
    #[must_use]
    pub const fn min(&self) -> Port {
        self.min
    }

    /// Returns the maximum port in the range.
    #[must_use]
    pub const fn max(&self) -> Port {
        self.max
    }

    /// Returns `true` if the range contains the given port.
    #[must_use]
    pub const fn contains(&self, port: Port) -> bool {
        port.value() >= self.min.value() && port.value() <= self.max.value()
    }

    /// Returns `true` if a raw integer lies inside the range.
    ///
    /// Used by request validation, where the number has not been narrowed
    /// to a [`Port`] yet.
    #[must_use]
    pub fn contains_value(&self, value: i64) -> bool {
        value >= i64::from(self.min.value()) && value <= i64::from(self.max.value())
    }

    /// Returns the number of ports in the range (inclusive).
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.max.value() as u32 - self.min.value() as u32 + 1
    }

    /// Always `false`; a constructed range holds at least one port.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns an ascending iterator over all ports in this range.
    #[must_use]
    pub fn iter(self) -> PortRangeIter {
        PortRangeIter {
            next: Some(self.min.value()),
            max: self.max.value(),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl IntoIterator for PortRange {
    type Item = Port;
    type IntoIter = PortRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over ports in a [`PortRange`].
#[derive(Debug)]
pub struct PortRangeIter {
    next: Option<u16>,
    max: u16,
}

impl Iterator for PortRangeIter {
    type Item = Port;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        // checked_add keeps a range ending at 65535 from wrapping around
        self.next = if current < self.max {
            current.checked_add(1)
        } else {
            None
        };
        Some(Port(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |current| usize::from(self.max - current) + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PortRangeIter {}

/// Error type for invalid port ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortRangeError {
    /// The minimum port.
    pub min: Port,
    /// The maximum port.
    pub max: Port,
    /// The reason the range is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid port range {}-{}: {}",
            self.min, self.max, self.reason
        )
    }
}

impl std::error::Error for InvalidPortRangeError {}
