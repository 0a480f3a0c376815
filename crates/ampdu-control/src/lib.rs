//! # ampdu-control
//!
//! Central controller that enables or disables 802.11 frame aggregation
//! (A-MPDU) on access points and stations as stations associate and leave.
//! Delay-sensitive traffic (VoIP) gets short frames; bulk TCP traffic gets
//! aggregation whenever its AP carries no delay-sensitive station.
//!
//! This crate provides:
//!
//! - **Domain types**: [`MacAddr`], [`AccessPointRegistry`], [`StationRegistry`],
//!   [`Position`], [`TopologyEvent`], the channel plan
//! - **Ports**: [`DeviceParameterSink`], [`PositionSource`], [`EventSource`]
//! - **Adapters**: [`RecordingSink`], [`StaticPositions`], [`ScriptedEvents`]
//! - **Policy**: [`AggregationController`], the association state machine
//!
//! # Example
//!
//! ```rust
//! use ampdu_control::{
//!     AggregationController, ApplicationClass, ControllerConfig, MacAddr, Position,
//!     RecordingSink, StaticPositions, TopologyEvent,
//! };
//!
//! let mut positions = StaticPositions::new();
//! positions.set_access_point(0, Position::new(0.0, 0.0));
//! positions.set_station(1, Position::new(3.0, 4.0));
//!
//! let mut ctl = AggregationController::new(
//!     ControllerConfig::default(),
//!     RecordingSink::new(),
//!     positions,
//! )?;
//! let ap = MacAddr::from_index(1);
//! ctl.add_access_point(0, ap, true)?;
//! ctl.add_station(1, ApplicationClass::VoipUpload)?;
//!
//! ctl.handle(&TopologyEvent::association(1, ap, 1.0))?;
//! assert_eq!(ctl.access_points().lookup_max_ampdu(0), Some(0));
//! # Ok::<(), ampdu_control::ControlError>(())
//! ```

#![forbid(unsafe_code)]

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod policy;
pub mod port;

// Re-export key types at the crate root for convenience.
pub use adapter::{DeviceCommand, RecordingSink, ScriptedEvents, StaticPositions};
pub use config::ControllerConfig;
pub use domain::{
    channel_plan, nearest, AccessCategory, AccessPointRecord, AccessPointRegistry,
    ApplicationClass, ChannelStrategy, EventKind, MacAddr, NodeId, Position, StationRecord,
    StationRegistry, TopologyEvent, WifiStandard,
};
pub use error::{ConfigError, ControlError, ControlResult, MacParseError, SinkError};
pub use policy::{Adjustment, AggregationController, RegistryReport, RunSummary};
pub use port::{DeviceParameterSink, EventSource, PositionSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
