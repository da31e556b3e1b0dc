#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # portmock
//!
//! A mock port allocator for test harnesses.
//!
//! Tests that need collision-free port numbers ask a small HTTP daemon for
//! them instead of binding sockets. The daemon keeps an in-memory registry of
//! handed-out ports and shuts itself down once nobody has talked to it for a
//! while.
//!
//! ## Core Types
//!
//! - [`Port`] and [`PortRange`]: Network port types with validation
//! - [`PortRegistry`], [`Allocation`] and [`ReservedPorts`]: Port reservation tracking
//! - [`IdleSupervisor`]: The self-termination deadline
//! - [`Settings`] and [`ConfigBuilder`]: Layered configuration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use portmock::{Port, PortRange, PortRegistry};
//!
//! let range = PortRange::new(
//!     Port::try_from(8000).unwrap(),
//!     Port::try_from(8010).unwrap(),
//! ).unwrap();
//! let registry = PortRegistry::new(range, Port::try_from(7999).unwrap());
//!
//! let allocation = registry.allocate_or_query(Port::try_from(8005).unwrap());
//! assert!(allocation.acquired());
//! assert_eq!(registry.list_reserved().joined(), "7999,8005");
//! ```

pub mod config;
pub mod error;
pub mod idle;
pub mod logging;
pub mod port;
pub mod registry;
pub mod server;
pub mod validation;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder, Settings};
pub use error::{Error, Result};
pub use idle::{IdleState, IdleSupervisor};
pub use logging::{init_logger, LogLevel, Logger};
pub use port::{Port, PortRange};
pub use registry::{Allocation, PortRegistry, ReservedPorts};
pub use server::AppState;
pub use validation::{ValidationError, ValidationKind};
