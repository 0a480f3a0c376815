//! Topology change notifications delivered to the controller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::mac::MacAddr;
use crate::domain::NodeId;

/// An association or disassociation reported by the radio layer.
///
/// The AP is identified by MAC, the station by node id. `at_secs` is the
/// simulated time of the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopologyEvent {
    /// The station completed association with the AP.
    Association {
        /// Station node id.
        station_id: NodeId,
        /// MAC of the AP the station joined.
        ap_mac: MacAddr,
        /// Simulated time in seconds.
        #[serde(default)]
        at_secs: f64,
    },
    /// The station left the AP.
    Disassociation {
        /// Station node id.
        station_id: NodeId,
        /// MAC of the AP the station left.
        ap_mac: MacAddr,
        /// Simulated time in seconds.
        #[serde(default)]
        at_secs: f64,
    },
}

/// Discriminant of a [`TopologyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Association,
    Disassociation,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Association => write!(f, "association"),
            Self::Disassociation => write!(f, "disassociation"),
        }
    }
}

impl TopologyEvent {
    /// Build an association event.
    pub fn association(station_id: NodeId, ap_mac: MacAddr, at_secs: f64) -> Self {
        Self::Association {
            station_id,
            ap_mac,
            at_secs,
        }
    }

    /// Build a disassociation event.
    pub fn disassociation(station_id: NodeId, ap_mac: MacAddr, at_secs: f64) -> Self {
        Self::Disassociation {
            station_id,
            ap_mac,
            at_secs,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Association { .. } => EventKind::Association,
            Self::Disassociation { .. } => EventKind::Disassociation,
        }
    }

    pub fn station_id(&self) -> NodeId {
        match self {
            Self::Association { station_id, .. } | Self::Disassociation { station_id, .. } => {
                *station_id
            }
        }
    }

    pub fn ap_mac(&self) -> MacAddr {
        match self {
            Self::Association { ap_mac, .. } | Self::Disassociation { ap_mac, .. } => *ap_mac,
        }
    }

    /// Simulated time in seconds.
    pub fn timestamp(&self) -> f64 {
        match self {
            Self::Association { at_secs, .. } | Self::Disassociation { at_secs, .. } => *at_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_read_either_variant() {
        let mac = MacAddr::from_index(1);
        let ev = TopologyEvent::disassociation(4, mac, 2.5);
        assert_eq!(ev.kind(), EventKind::Disassociation);
        assert_eq!(ev.station_id(), 4);
        assert_eq!(ev.ap_mac(), mac);
        assert_eq!(ev.timestamp(), 2.5);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let json = r#"{"type":"association","station_id":3,"ap_mac":"00:00:00:00:00:01","at_secs":1.0}"#;
        let ev: TopologyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(ev, TopologyEvent::association(3, MacAddr::from_index(1), 1.0));
    }
}
