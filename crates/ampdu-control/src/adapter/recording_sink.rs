//! Sink that keeps every pushed command in memory.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::domain::{AccessCategory, NodeId};
use crate::error::SinkError;
use crate::port::DeviceParameterSink;

// ---------------------------------------------------------------------------
// DeviceCommand
// ---------------------------------------------------------------------------

/// One parameter push accepted by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DeviceCommand {
    /// A-MPDU ceiling change.
    SetMaxAmpduSize {
        node: NodeId,
        categories: Vec<AccessCategory>,
        size_bytes: u32,
    },
    /// Channel change.
    SetChannel { node: NodeId, channel: u8 },
}

impl DeviceCommand {
    /// Node the command was addressed to.
    pub fn node(&self) -> NodeId {
        match self {
            Self::SetMaxAmpduSize { node, .. } | Self::SetChannel { node, .. } => *node,
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetMaxAmpduSize {
                node,
                categories,
                size_bytes,
            } => {
                let cats: Vec<String> = categories.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "node #{node}: max A-MPDU [{}] = {size_bytes} B",
                    cats.join(",")
                )
            }
            Self::SetChannel { node, channel } => write!(f, "node #{node}: channel {channel}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Device sink that records commands instead of touching a radio.
///
/// Nodes marked with [`reject_node`](Self::reject_node) refuse every push,
/// which lets callers exercise the best-effort error path.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<DeviceCommand>,
    ampdu_sizes: HashMap<NodeId, u32>,
    channels: HashMap<NodeId, u8>,
    rejected: HashSet<NodeId>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later push addressed to `node` fail.
    pub fn reject_node(&mut self, node: NodeId) {
        self.rejected.insert(node);
    }

    /// Commands accepted so far, in push order.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drain the command log. Per-node state is kept.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Last A-MPDU ceiling pushed to `node`.
    pub fn ampdu_size(&self, node: NodeId) -> Option<u32> {
        self.ampdu_sizes.get(&node).copied()
    }

    /// Last channel pushed to `node`.
    pub fn channel(&self, node: NodeId) -> Option<u8> {
        self.channels.get(&node).copied()
    }

    fn check(&self, node: NodeId) -> Result<(), SinkError> {
        if self.rejected.contains(&node) {
            return Err(SinkError::Rejected {
                node,
                reason: "node configured to reject updates".into(),
            });
        }
        Ok(())
    }
}

impl DeviceParameterSink for RecordingSink {
    fn set_max_ampdu_size(
        &mut self,
        node: NodeId,
        categories: &[AccessCategory],
        size_bytes: u32,
    ) -> Result<(), SinkError> {
        self.check(node)?;
        self.ampdu_sizes.insert(node, size_bytes);
        self.commands.push(DeviceCommand::SetMaxAmpduSize {
            node,
            categories: categories.to_vec(),
            size_bytes,
        });
        Ok(())
    }

    fn set_channel(&mut self, node: NodeId, channel: u8) -> Result<(), SinkError> {
        self.check(node)?;
        self.channels.insert(node, channel);
        self.commands.push(DeviceCommand::SetChannel { node, channel });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_and_last_values() {
        let mut sink = RecordingSink::new();
        sink.set_max_ampdu_size(1, &AccessCategory::ALL, 65_535).unwrap();
        sink.set_max_ampdu_size(1, &AccessCategory::ALL, 0).unwrap();
        sink.set_channel(2, 40).unwrap();

        assert_eq!(sink.commands().len(), 3);
        assert_eq!(sink.ampdu_size(1), Some(0));
        assert_eq!(sink.channel(2), Some(40));
        assert_eq!(sink.ampdu_size(2), None);
    }

    #[test]
    fn rejected_node_is_not_recorded() {
        let mut sink = RecordingSink::new();
        sink.reject_node(9);
        let err = sink.set_channel(9, 36).unwrap_err();
        assert!(matches!(err, SinkError::Rejected { node: 9, .. }));
        assert!(sink.commands().is_empty());
        assert_eq!(sink.channel(9), None);
    }

    #[test]
    fn take_commands_keeps_state() {
        let mut sink = RecordingSink::new();
        sink.set_channel(3, 44).unwrap();
        let taken = sink.take_commands();
        assert_eq!(taken, vec![DeviceCommand::SetChannel { node: 3, channel: 44 }]);
        assert!(sink.commands().is_empty());
        assert_eq!(sink.channel(3), Some(44));
    }

    #[test]
    fn display_lists_categories() {
        let cmd = DeviceCommand::SetMaxAmpduSize {
            node: 4,
            categories: AccessCategory::ALL.to_vec(),
            size_bytes: 0,
        };
        assert_eq!(cmd.to_string(), "node #4: max A-MPDU [VI,VO,BE,BK] = 0 B");
    }
}
