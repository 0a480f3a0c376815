//! Access point registry.
//!
//! One [`AccessPointRecord`] exists per AP for the lifetime of a run. The
//! registry keeps records in creation order for listings and indexes them by
//! MAC (the join key carried by association events) and by node id.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::mac::MacAddr;
use crate::domain::NodeId;
use crate::error::{ControlError, ControlResult};

// ---------------------------------------------------------------------------
// AccessPointRecord -- Entity
// ---------------------------------------------------------------------------

/// Aggregation state of a single access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPointRecord {
    /// Node id assigned at creation.
    pub id: NodeId,
    /// Link-layer address of the AP's wireless interface.
    pub mac: MacAddr,
    /// Current A-MPDU ceiling in bytes. `0` disables aggregation.
    pub max_ampdu_size: u32,
    /// Radio channel the AP operates on.
    pub channel: u8,
}

// ---------------------------------------------------------------------------
// AccessPointRegistry -- Aggregate
// ---------------------------------------------------------------------------

/// Every access point known to the controller.
///
/// Records are never removed during a run.
#[derive(Debug, Clone, Default)]
pub struct AccessPointRegistry {
    /// Records in creation order.
    records: Vec<AccessPointRecord>,
    /// MAC -> index into `records`.
    by_mac: HashMap<MacAddr, usize>,
    /// Node id -> index into `records`.
    by_id: HashMap<NodeId, usize>,
}

impl AccessPointRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new access point.
    ///
    /// Fails if the MAC or the id is already present.
    pub fn register(
        &mut self,
        id: NodeId,
        mac: MacAddr,
        initial_max_ampdu: u32,
        channel: u8,
    ) -> ControlResult<()> {
        if self.by_mac.contains_key(&mac) || self.by_id.contains_key(&id) {
            return Err(ControlError::DuplicateAccessPoint { id, mac });
        }

        let idx = self.records.len();
        self.records.push(AccessPointRecord {
            id,
            mac,
            max_ampdu_size: initial_max_ampdu,
            channel,
        });
        self.by_mac.insert(mac, idx);
        self.by_id.insert(id, idx);
        Ok(())
    }

    /// Overwrite the id and aggregation ceiling of the record with this MAC.
    ///
    /// Returns `false` without touching anything when no record matches.
    pub fn update(&mut self, mac: &MacAddr, new_id: NodeId, new_max_ampdu: u32) -> bool {
        let Some(&idx) = self.by_mac.get(mac) else {
            return false;
        };

        let old_id = self.records[idx].id;
        if old_id != new_id {
            // Another record already owns the new id.
            if self.by_id.contains_key(&new_id) {
                return false;
            }
            self.by_id.remove(&old_id);
            self.by_id.insert(new_id, idx);
        }

        let record = &mut self.records[idx];
        record.id = new_id;
        record.max_ampdu_size = new_max_ampdu;
        true
    }

    /// Node id of the AP with this MAC.
    pub fn lookup_id(&self, mac: &MacAddr) -> Option<NodeId> {
        self.get(mac).map(|r| r.id)
    }

    /// Current aggregation ceiling of the AP with this id.
    pub fn lookup_max_ampdu(&self, id: NodeId) -> Option<u32> {
        self.get_by_id(id).map(|r| r.max_ampdu_size)
    }

    /// Radio channel of the AP with this id.
    pub fn lookup_channel(&self, id: NodeId) -> Option<u8> {
        self.get_by_id(id).map(|r| r.channel)
    }

    /// Record with this MAC.
    pub fn get(&self, mac: &MacAddr) -> Option<&AccessPointRecord> {
        self.by_mac.get(mac).map(|&idx| &self.records[idx])
    }

    /// Record with this node id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&AccessPointRecord> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    /// Number of registered access points.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether no access point has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in creation order.
    pub fn list(&self) -> &[AccessPointRecord] {
        &self.records
    }

    /// Iterate over all records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &AccessPointRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_two() -> AccessPointRegistry {
        let mut reg = AccessPointRegistry::new();
        reg.register(0, MacAddr::from_index(1), 65_535, 36).unwrap();
        reg.register(1, MacAddr::from_index(2), 65_535, 40).unwrap();
        reg
    }

    #[test]
    fn register_and_lookup() {
        let reg = registry_with_two();
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.lookup_id(&MacAddr::from_index(2)), Some(1));
        assert_eq!(reg.lookup_max_ampdu(0), Some(65_535));
        assert_eq!(reg.lookup_channel(1), Some(40));
    }

    #[test]
    fn lookups_miss_explicitly() {
        let reg = registry_with_two();
        assert_eq!(reg.lookup_id(&MacAddr::from_index(9)), None);
        assert_eq!(reg.lookup_max_ampdu(7), None);
        assert_eq!(reg.lookup_channel(7), None);
    }

    #[test]
    fn duplicate_mac_or_id_is_rejected() {
        let mut reg = registry_with_two();
        assert!(matches!(
            reg.register(5, MacAddr::from_index(1), 0, 36),
            Err(ControlError::DuplicateAccessPoint { id: 5, .. })
        ));
        assert!(reg.register(1, MacAddr::from_index(5), 0, 36).is_err());
        assert_eq!(reg.count(), 2);
    }

    #[test]
    fn update_overwrites_matching_record_only() {
        let mut reg = registry_with_two();
        assert!(reg.update(&MacAddr::from_index(1), 0, 0));
        assert_eq!(reg.lookup_max_ampdu(0), Some(0));
        assert_eq!(reg.lookup_max_ampdu(1), Some(65_535));
    }

    #[test]
    fn update_of_unknown_mac_is_a_no_op() {
        let mut reg = registry_with_two();
        let before = reg.list().to_vec();
        assert!(!reg.update(&MacAddr::from_index(42), 9, 0));
        assert_eq!(reg.list(), before.as_slice());
    }

    #[test]
    fn update_can_move_the_id() {
        let mut reg = registry_with_two();
        assert!(reg.update(&MacAddr::from_index(2), 7, 1024));
        assert_eq!(reg.lookup_id(&MacAddr::from_index(2)), Some(7));
        assert_eq!(reg.lookup_max_ampdu(7), Some(1024));
        assert_eq!(reg.lookup_max_ampdu(1), None);
    }

    #[test]
    fn list_preserves_creation_order() {
        let reg = registry_with_two();
        let ids: Vec<NodeId> = reg.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
