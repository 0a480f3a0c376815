//! Fixed position table standing in for a mobility model.

use std::collections::HashMap;

use crate::domain::{NodeId, Position};
use crate::port::PositionSource;

/// Position source backed by two maps, one for APs and one for stations.
///
/// Stations can be moved between events with
/// [`move_station`](Self::move_station).
#[derive(Debug, Clone, Default)]
pub struct StaticPositions {
    access_points: HashMap<NodeId, Position>,
    stations: HashMap<NodeId, Position>,
}

impl StaticPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an access point.
    pub fn set_access_point(&mut self, ap: NodeId, position: Position) {
        self.access_points.insert(ap, position);
    }

    /// Place a station.
    pub fn set_station(&mut self, station: NodeId, position: Position) {
        self.stations.insert(station, position);
    }

    /// Move a known station. Returns `false` if the station was never placed.
    pub fn move_station(&mut self, station: NodeId, position: Position) -> bool {
        match self.stations.get_mut(&station) {
            Some(p) => {
                *p = position;
                true
            }
            None => false,
        }
    }
}

impl PositionSource for StaticPositions {
    fn station_position(&self, station: NodeId) -> Option<Position> {
        self.stations.get(&station).copied()
    }

    fn access_point_position(&self, ap: NodeId) -> Option<Position> {
        self.access_points.get(&ap).copied()
    }
}
