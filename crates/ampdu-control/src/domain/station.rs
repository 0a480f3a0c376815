//! Station records and the station registry.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::mac::MacAddr;
use crate::domain::NodeId;
use crate::error::{ControlError, ControlResult};

// ---------------------------------------------------------------------------
// ApplicationClass -- Value Object
// ---------------------------------------------------------------------------

/// The kind of traffic a station runs. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationClass {
    /// No application attached.
    #[default]
    None,
    /// VoIP flow from the station to the wired side.
    VoipUpload,
    /// VoIP flow from the wired side to the station.
    VoipDownload,
    /// Bulk TCP transfer from the station.
    TcpUpload,
    /// Bulk TCP transfer to the station.
    TcpDownload,
}

impl ApplicationClass {
    /// VoIP-like traffic that suffers from queueing behind aggregated frames.
    pub fn is_delay_sensitive(self) -> bool {
        matches!(self, Self::VoipUpload | Self::VoipDownload)
    }

    /// Bulk traffic that benefits from aggregation.
    pub fn is_throughput_oriented(self) -> bool {
        matches!(self, Self::TcpUpload | Self::TcpDownload)
    }
}

impl fmt::Display for ApplicationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::VoipUpload => write!(f, "VoIP upload"),
            Self::VoipDownload => write!(f, "VoIP download"),
            Self::TcpUpload => write!(f, "TCP upload"),
            Self::TcpDownload => write!(f, "TCP download"),
        }
    }
}

// ---------------------------------------------------------------------------
// StationRecord -- Entity
// ---------------------------------------------------------------------------

/// Association and aggregation state of one station.
///
/// `ap_mac` is `None` while the station is not associated, so a
/// disassociated station can never be counted on an AP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRecord {
    /// Node id of the station.
    pub station_id: NodeId,
    /// Traffic the station runs.
    pub application: ApplicationClass,
    /// MAC of the AP the station is associated to.
    pub ap_mac: Option<MacAddr>,
    /// Current A-MPDU ceiling in bytes applied to this station.
    pub max_ampdu_size: u32,
}

impl StationRecord {
    /// A new, not yet associated station.
    pub fn new(station_id: NodeId, application: ApplicationClass, max_ampdu_size: u32) -> Self {
        Self {
            station_id,
            application,
            ap_mac: None,
            max_ampdu_size,
        }
    }

    /// Whether the station is currently associated to some AP.
    pub fn is_associated(&self) -> bool {
        self.ap_mac.is_some()
    }

    /// Whether the station is currently associated to the AP with this MAC.
    pub fn is_associated_to(&self, mac: &MacAddr) -> bool {
        self.ap_mac.as_ref() == Some(mac)
    }

    pub(crate) fn associate(&mut self, mac: MacAddr) {
        self.ap_mac = Some(mac);
    }

    pub(crate) fn disassociate(&mut self) {
        self.ap_mac = None;
    }
}

// ---------------------------------------------------------------------------
// StationRegistry -- Aggregate
// ---------------------------------------------------------------------------

/// Every station known to the controller, in creation order.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    records: Vec<StationRecord>,
    by_id: HashMap<NodeId, usize>,
}

impl StationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a station record. Fails on a duplicate id.
    pub fn register(&mut self, record: StationRecord) -> ControlResult<()> {
        if self.by_id.contains_key(&record.station_id) {
            return Err(ControlError::DuplicateStation {
                station_id: record.station_id,
            });
        }
        self.by_id.insert(record.station_id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Record of this station.
    pub fn get(&self, station_id: NodeId) -> Option<&StationRecord> {
        self.by_id.get(&station_id).map(|&idx| &self.records[idx])
    }

    /// Mutable record of this station.
    pub fn get_mut(&mut self, station_id: NodeId) -> Option<&mut StationRecord> {
        self.by_id
            .get(&station_id)
            .map(|&idx| &mut self.records[idx])
    }

    /// Number of stations currently associated to any AP.
    pub fn count_associated(&self) -> usize {
        self.records.iter().filter(|r| r.is_associated()).count()
    }

    /// Number of stations of one application class associated to this AP.
    pub fn count_associated_to(&self, ap_mac: &MacAddr, application: ApplicationClass) -> usize {
        self.associated_to(ap_mac)
            .filter(|r| r.application == application)
            .count()
    }

    /// Number of delay-sensitive stations associated to this AP.
    pub fn count_delay_sensitive_on(&self, ap_mac: &MacAddr) -> usize {
        self.associated_to(ap_mac)
            .filter(|r| r.application.is_delay_sensitive())
            .count()
    }

    /// Stations currently associated to this AP, in creation order.
    pub fn associated_to<'a>(
        &'a self,
        ap_mac: &'a MacAddr,
    ) -> impl Iterator<Item = &'a StationRecord> + 'a {
        self.records.iter().filter(move |r| r.is_associated_to(ap_mac))
    }

    /// Number of registered stations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no station has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in creation order.
    pub fn list(&self) -> &[StationRecord] {
        &self.records
    }

    /// Iterate over all records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(n: u32) -> MacAddr {
        MacAddr::from_index(n)
    }

    fn populated() -> StationRegistry {
        let mut reg = StationRegistry::new();
        let classes = [
            ApplicationClass::VoipUpload,
            ApplicationClass::TcpUpload,
            ApplicationClass::TcpDownload,
            ApplicationClass::VoipDownload,
        ];
        for (i, class) in classes.into_iter().enumerate() {
            reg.register(StationRecord::new(10 + i as NodeId, class, 0))
                .unwrap();
        }
        reg.get_mut(10).unwrap().associate(ap(1));
        reg.get_mut(11).unwrap().associate(ap(1));
        reg.get_mut(12).unwrap().associate(ap(2));
        reg
    }

    #[test]
    fn class_predicates() {
        assert!(ApplicationClass::VoipUpload.is_delay_sensitive());
        assert!(ApplicationClass::VoipDownload.is_delay_sensitive());
        assert!(ApplicationClass::TcpUpload.is_throughput_oriented());
        assert!(ApplicationClass::TcpDownload.is_throughput_oriented());
        assert!(!ApplicationClass::None.is_delay_sensitive());
        assert!(!ApplicationClass::None.is_throughput_oriented());
    }

    #[test]
    fn counts_follow_association_state() {
        let reg = populated();
        assert_eq!(reg.count_associated(), 3);
        assert_eq!(reg.count_associated_to(&ap(1), ApplicationClass::VoipUpload), 1);
        assert_eq!(reg.count_associated_to(&ap(1), ApplicationClass::TcpUpload), 1);
        assert_eq!(reg.count_associated_to(&ap(2), ApplicationClass::VoipUpload), 0);
        assert_eq!(reg.count_delay_sensitive_on(&ap(1)), 1);
    }

    #[test]
    fn disassociated_station_is_not_counted() {
        let mut reg = populated();
        reg.get_mut(10).unwrap().disassociate();
        assert_eq!(reg.count_associated(), 2);
        assert_eq!(reg.count_delay_sensitive_on(&ap(1)), 0);
        assert!(reg.get(10).unwrap().ap_mac.is_none());
    }

    #[test]
    fn duplicate_station_is_rejected() {
        let mut reg = populated();
        let err = reg
            .register(StationRecord::new(11, ApplicationClass::None, 0))
            .unwrap_err();
        assert!(matches!(err, ControlError::DuplicateStation { station_id: 11 }));
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn application_class_serde_names() {
        let json = serde_json::to_string(&ApplicationClass::VoipDownload).unwrap();
        assert_eq!(json, "\"voip_download\"");
        let class: ApplicationClass = serde_json::from_str("\"tcp_upload\"").unwrap();
        assert_eq!(class, ApplicationClass::TcpUpload);
    }
}
