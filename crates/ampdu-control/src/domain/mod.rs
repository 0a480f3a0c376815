//! Domain types for the aggregation controller.

pub mod access_point;
pub mod channel;
pub mod event;
pub mod mac;
pub mod position;
pub mod station;

/// Identifier of a simulated node (AP or station).
pub type NodeId = u32;

pub use access_point::{AccessPointRecord, AccessPointRegistry};
pub use channel::{channel_plan, AccessCategory, ChannelStrategy, WifiStandard};
pub use event::{EventKind, TopologyEvent};
pub use mac::MacAddr;
pub use position::{nearest, Position};
pub use station::{ApplicationClass, StationRecord, StationRegistry};
