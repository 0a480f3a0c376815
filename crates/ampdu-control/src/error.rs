//! Error types for the aggregation controller.
//!
//! # Error Hierarchy
//!
//! - [`ControlError`]: top-level error returned by controller operations
//! - [`ConfigError`]: configuration loading and validation
//! - [`SinkError`]: failures reported by a device parameter sink
//! - [`MacParseError`]: malformed link-layer addresses

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::mac::MacAddr;
use crate::domain::NodeId;

/// Convenient `Result` alias used by controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Top-level error type for the aggregation controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControlError {
    /// The configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A device parameter sink refused a push.
    #[error("Device sink error: {0}")]
    Sink(#[from] SinkError),

    /// An access point with the same MAC or id is already registered.
    #[error("Access point already registered: id {id}, MAC {mac}")]
    DuplicateAccessPoint {
        /// The id that was offered.
        id: NodeId,
        /// The MAC address that was offered.
        mac: MacAddr,
    },

    /// A station with the same id is already registered.
    #[error("Station #{station_id} already registered")]
    DuplicateStation {
        /// The duplicated station id.
        station_id: NodeId,
    },

    /// An event referenced a station that was never registered.
    #[error("Unknown station #{station_id}")]
    UnknownStation {
        /// The station id carried by the event.
        station_id: NodeId,
    },

    /// A nearest-AP query was made with no candidate access points.
    #[error("No access points available for nearest-AP selection")]
    NoAccessPoints,

    /// The mobility collaborator has no position for a node.
    #[error("Position unavailable for node #{node}")]
    PositionUnavailable {
        /// The node whose position was requested.
        node: NodeId,
    },

    /// Stations and access points share one node id space on the sink.
    #[error("Node id {id} is already used by another node")]
    NodeIdInUse {
        /// The contested id.
        id: NodeId,
    },

    /// With the policy enabled every access point must start aggregating.
    #[error("Access point #{id} must start with aggregation enabled while the policy is active")]
    AggregationMustStartEnabled {
        /// The access point that was offered with aggregation disabled.
        id: NodeId,
    },
}

/// Errors raised while loading or validating a [`crate::config::ControllerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("Cannot access config file {path:?}: {source}")]
    FileRead {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A field holds a value that contradicts the rest of the configuration.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The file is not valid JSON for this configuration.
    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new invalid-value error.
    #[must_use]
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors a [`crate::port::DeviceParameterSink`] may report.
///
/// The controller treats every sink push as best effort: these errors are
/// logged and never roll back registry state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The device refused the parameter.
    #[error("Node #{node} rejected the update: {reason}")]
    Rejected {
        /// Node that refused the push.
        node: NodeId,
        /// Reason given by the device.
        reason: String,
    },

    /// The sink does not know the node.
    #[error("Node #{node} is not attached to this sink")]
    UnknownNode {
        /// Node that was addressed.
        node: NodeId,
    },
}

/// Failed to parse a MAC address string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to parse MAC address from '{input}': expected aa:bb:cc:dd:ee:ff")]
pub struct MacParseError {
    /// The input string that could not be parsed.
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_control_error() {
        let err: ControlError = ConfigError::invalid_value("num_channels", "must be > 0").into();
        assert!(matches!(err, ControlError::Config(_)));
        assert!(err.to_string().contains("num_channels"));
    }

    #[test]
    fn sink_error_display_names_node() {
        let err = SinkError::UnknownNode { node: 7 };
        assert_eq!(err.to_string(), "Node #7 is not attached to this sink");
    }
}
