//! JSON bodies returned by the HTTP endpoints.
//!
//! Field names and order are part of the wire format that existing test
//! harnesses parse.

use serde::{Deserialize, Serialize};

use crate::registry::{port_or_none, Allocation, ReservedPorts};
use crate::validation::ValidationError;

/// `free` value reported when the requested port was rejected.
pub const NO_PORT_CHECKED: &str = "0000";

/// State reported by a successful action.
pub const STATE_OK: &str = "OK";

/// Body of `/test/{port}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResponse {
    /// The path segment as received.
    pub test: String,
    /// `pass`, `fail`, `format` or `range`.
    pub state: String,
    /// Human-readable explanation.
    pub note: String,
    /// The reserved port, a suggested free port, `NONE` or `0000`.
    pub free: String,
}

impl TestResponse {
    /// Describes the outcome of an allocate-or-query call.
    #[must_use]
    pub fn from_allocation(requested: &str, allocation: &Allocation) -> Self {
        match allocation {
            Allocation::Acquired(port) => Self {
                test: requested.to_string(),
                state: "pass".into(),
                note: "Can be used".into(),
                free: port.to_string(),
            },
            Allocation::InUse { free, .. } => Self {
                test: requested.to_string(),
                state: "fail".into(),
                note: "Port is in use".into(),
                free: port_or_none(*free),
            },
        }
    }

    /// Describes a port parameter that failed validation.
    #[must_use]
    pub fn rejected(requested: &str, err: &ValidationError) -> Self {
        Self {
            test: requested.to_string(),
            state: err.reason().into(),
            note: err.note.clone(),
            free: NO_PORT_CHECKED.into(),
        }
    }
}

/// Body of `/status`, `/ping`, `/reset`, `/stop` and `/timeout/{seconds}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Upper-case action name, e.g. `STATUS`.
    pub action: String,
    /// `OK`, or the validation reason for a rejected timeout.
    pub state: String,
    /// Empty on success.
    pub note: String,
    /// Seconds until the idle deadline. May be negative.
    pub timeout: i64,
    /// Number of reserved ports, the daemon's own included.
    pub inuse: usize,
}

/// Body of `/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Always `list`.
    pub action: String,
    /// Always `ok`.
    pub state: String,
    /// Comma-separated reserved ports.
    pub ports: String,
    /// Number of reserved ports.
    pub inuse: usize,
}

impl From<&ReservedPorts> for ListResponse {
    fn from(reserved: &ReservedPorts) -> Self {
        Self {
            action: "list".into(),
            state: "ok".into(),
            ports: reserved.joined(),
            inuse: reserved.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Port, PortRange};
    use crate::registry::PortRegistry;
    use crate::validation::validate_port;

    fn port(n: u16) -> Port {
        Port::try_from(n).unwrap()
    }

    #[test]
    fn test_pass_and_fail_bodies() {
        let range = PortRange::new(port(8000), port(9000)).unwrap();
        let registry = PortRegistry::new(range, port(7999));

        let first = registry.allocate_or_query(port(8500));
        let body = serde_json::to_string(&TestResponse::from_allocation("8500", &first)).unwrap();
        assert_eq!(
            body,
            r#"{"test":"8500","state":"pass","note":"Can be used","free":"8500"}"#
        );

        let second = registry.allocate_or_query(port(8500));
        let response = TestResponse::from_allocation("8500", &second);
        assert_eq!(response.state, "fail");
        assert_eq!(response.note, "Port is in use");
        assert_eq!(response.free, "8000");
    }

    #[test]
    fn test_fail_with_exhausted_range() {
        let allocation = Allocation::InUse {
            requested: port(8000),
            free: None,
        };
        assert_eq!(TestResponse::from_allocation("8000", &allocation).free, "NONE");
    }

    #[test]
    fn test_rejected_body() {
        let range = PortRange::new(port(8000), port(9000)).unwrap();
        let err = validate_port("80", &range).unwrap_err();
        let response = TestResponse::rejected("80", &err);
        assert_eq!(response.state, "range");
        assert_eq!(response.note, "< 8000 or > 9000");
        assert_eq!(response.free, "0000");
    }

    #[test]
    fn test_action_field_order() {
        let body = serde_json::to_string(&ActionResponse {
            action: "STATUS".into(),
            state: STATE_OK.into(),
            note: String::new(),
            timeout: 20,
            inuse: 1,
        })
        .unwrap();
        assert_eq!(
            body,
            r#"{"action":"STATUS","state":"OK","note":"","timeout":20,"inuse":1}"#
        );
    }

    #[test]
    fn test_list_body() {
        let range = PortRange::new(port(8000), port(9000)).unwrap();
        let registry = PortRegistry::new(range, port(7999));
        registry.allocate_or_query(port(8001));

        let response = ListResponse::from(&registry.list_reserved());
        assert_eq!(response.ports, "7999,8001");
        assert_eq!(response.inuse, 2);
        assert_eq!(response.action, "list");
        assert_eq!(response.state, "ok");
    }
}
