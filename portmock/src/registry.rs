//! The in-memory port registry.
//!
//! [`PortRegistry`] owns the map of reserved ports. Every operation takes the
//! registry lock for its whole read-modify-write cycle and does nothing but
//! in-memory work while holding it, so operations are linearizable with
//! respect to each other.
//!
//! Ports are only ever reserved one at a time through
//! [`PortRegistry::allocate_or_query`] and are only released all together by
//! [`PortRegistry::reset`].

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

use crate::port::{Port, PortRange};

#[cfg(test)]
mod proptests;

/// Text reported in place of a port when the whole range is reserved.
pub const NO_PORTS_AVAILABLE: &str = "NONE";

/// Marker stored for each reserved port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The port the daemon itself listens on. Survives every reset.
    Server,
    /// A port handed out to a client.
    Requested,
}

/// Outcome of [`PortRegistry::allocate_or_query`].
///
/// # Examples
///
/// ```
/// use portmock::{Port, PortRange, PortRegistry};
///
/// let range = PortRange::new(
///     Port::try_from(8000).unwrap(),
///     Port::try_from(9000).unwrap(),
/// ).unwrap();
/// let registry = PortRegistry::new(range, Port::try_from(7999).unwrap());
/// let port = Port::try_from(8500).unwrap();
///
/// let first = registry.allocate_or_query(port);
/// assert!(first.acquired());
/// assert_eq!(first.result_port(), Some(port));
///
/// let second = registry.allocate_or_query(port);
/// assert!(!second.acquired());
/// assert_eq!(second.result_port(), Some(Port::try_from(8000).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// The requested port was free and is now reserved.
    Acquired(Port),
    /// The requested port was already reserved. `free` is the lowest
    /// unreserved port of the range, reported but not reserved, or `None`
    /// when the range is exhausted.
    InUse {
        /// The port that was asked for.
        requested: Port,
        /// First free port of the range, if any.
        free: Option<Port>,
    },
}

impl Allocation {
    /// Whether the requested port was reserved by this call.
    #[must_use]
    pub const fn acquired(&self) -> bool {
        matches!(self, Self::Acquired(_))
    }

    /// The acquired port, or the suggested free port, or `None` when no port
    /// is available.
    #[must_use]
    pub const fn result_port(&self) -> Option<Port> {
        match self {
            Self::Acquired(port) => Some(*port),
            Self::InUse { free, .. } => *free,
        }
    }

    /// [`Self::result_port`] rendered as text, using [`NO_PORTS_AVAILABLE`]
    /// when there is none.
    #[must_use]
    pub fn result_text(&self) -> String {
        port_or_none(self.result_port())
    }
}

/// Renders an optional port, using [`NO_PORTS_AVAILABLE`] for `None`.
#[must_use]
pub fn port_or_none(port: Option<Port>) -> String {
    port.map_or_else(|| NO_PORTS_AVAILABLE.to_string(), |p| p.to_string())
}

/// A snapshot of the reserved ports, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedPorts {
    ports: Vec<Port>,
}

impl ReservedPorts {
    /// The reserved ports in ascending order.
    #[must_use]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Number of reserved ports, the server's own port included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ports.len()
    }

    /// Comma-joined list, e.g. `"7999,8500"`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.ports
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ReservedPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Concurrency-safe registry of reserved ports.
///
/// Share it behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct PortRegistry {
    range: PortRange,
    server_port: Port,
    reserved: Mutex<HashMap<Port, Reservation>>,
}

impl PortRegistry {
    /// Creates a registry over `range` with `server_port` reserved.
    ///
    /// The server port may lie outside `range`; it is reserved either way
    /// and counts toward [`ReservedPorts::count`].
    #[must_use]
    pub fn new(range: PortRange, server_port: Port) -> Self {
        Self {
            range,
            server_port,
            reserved: Mutex::new(Self::seeded(server_port)),
        }
    }

    fn seeded(server_port: Port) -> HashMap<Port, Reservation> {
        let mut reserved = HashMap::with_capacity(16);
        reserved.insert(server_port, Reservation::Server);
        reserved
    }

    /// The allocation range.
    #[must_use]
    pub const fn range(&self) -> PortRange {
        self.range
    }

    /// The daemon's own port.
    #[must_use]
    pub const fn server_port(&self) -> Port {
        self.server_port
    }

    /// Reserves `port` if it is free, otherwise reports the first free port
    /// of the range without reserving it.
    ///
    /// `port` must already have been validated against the range.
    pub fn allocate_or_query(&self, port: Port) -> Allocation {
        debug_assert!(self.range.contains(port), "{port} outside {}", self.range);

        let mut reserved = self.reserved.lock();
        if reserved.contains_key(&port) {
            let free = Self::first_free_in(&reserved, self.range);
            return Allocation::InUse {
                requested: port,
                free,
            };
        }

        reserved.insert(port, Reservation::Requested);
        Allocation::Acquired(port)
    }

    /// Returns the lowest unreserved port of the range, or `None` if every
    /// port is reserved.
    #[must_use]
    pub fn find_first_free(&self) -> Option<Port> {
        let reserved = self.reserved.lock();
        Self::first_free_in(&reserved, self.range)
    }

    fn first_free_in(reserved: &HashMap<Port, Reservation>, range: PortRange) -> Option<Port> {
        range.iter().find(|port| !reserved.contains_key(port))
    }

    /// Returns a snapshot of all reserved ports.
    #[must_use]
    pub fn list_reserved(&self) -> ReservedPorts {
        let mut ports: Vec<Port> = self.reserved.lock().keys().copied().collect();
        ports.sort_unstable();
        ReservedPorts { ports }
    }

    /// Number of reserved ports, the server's own port included.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.reserved.lock().len()
    }

    /// Returns the reservation marker for `port`, if it is reserved.
    #[must_use]
    pub fn reservation(&self, port: Port) -> Option<Reservation> {
        self.reserved.lock().get(&port).copied()
    }

    /// Drops every reservation except the server's own port.
    pub fn reset(&self) {
        let mut reserved = self.reserved.lock();
        *reserved = Self::seeded(self.server_port);
    }
}
