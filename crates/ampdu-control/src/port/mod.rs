//! Ports to the collaborators around the controller.
//!
//! The controller never talks to a radio, a mobility model or a simulator
//! scheduler directly. It pushes parameters through a
//! [`DeviceParameterSink`], reads positions from a [`PositionSource`] and is
//! fed by an [`EventSource`]. In-memory adapters live in [`crate::adapter`].

mod device_sink;
mod event_source;
mod position_source;

pub use device_sink::DeviceParameterSink;
pub use event_source::EventSource;
pub use position_source::PositionSource;
