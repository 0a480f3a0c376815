//! The driven port through which the controller applies device parameters.

use crate::domain::{AccessCategory, NodeId};
use crate::error::SinkError;

/// Port that applies aggregation and channel settings to a concrete device.
///
/// Implementations include:
/// - [`crate::adapter::RecordingSink`] -- keeps every command in memory.
///
/// Calls are synchronous and best effort. The controller logs a returned
/// error and keeps its registry state.
pub trait DeviceParameterSink {
    /// Set the A-MPDU ceiling of `node` for the given access categories.
    ///
    /// The controller always passes [`AccessCategory::ALL`].
    fn set_max_ampdu_size(
        &mut self,
        node: NodeId,
        categories: &[AccessCategory],
        size_bytes: u32,
    ) -> Result<(), SinkError>;

    /// Move `node` to a radio channel.
    fn set_channel(&mut self, node: NodeId, channel: u8) -> Result<(), SinkError>;
}

impl<T: DeviceParameterSink + ?Sized> DeviceParameterSink for &mut T {
    fn set_max_ampdu_size(
        &mut self,
        node: NodeId,
        categories: &[AccessCategory],
        size_bytes: u32,
    ) -> Result<(), SinkError> {
        (**self).set_max_ampdu_size(node, categories, size_bytes)
    }

    fn set_channel(&mut self, node: NodeId, channel: u8) -> Result<(), SinkError> {
        (**self).set_channel(node, channel)
    }
}
