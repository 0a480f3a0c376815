//! In-memory adapters for the controller ports.
//!
//! - [`RecordingSink`]: [`DeviceParameterSink`](crate::port::DeviceParameterSink)
//!   that records every command and tracks the last value per node.
//! - [`StaticPositions`]: [`PositionSource`](crate::port::PositionSource)
//!   backed by a map of fixed (but movable) positions.
//! - [`ScriptedEvents`]: [`EventSource`](crate::port::EventSource) that
//!   replays a list of events in timestamp order.

mod recording_sink;
mod scripted_events;
mod static_positions;

pub use recording_sink::{DeviceCommand, RecordingSink};
pub use scripted_events::ScriptedEvents;
pub use static_positions::StaticPositions;
