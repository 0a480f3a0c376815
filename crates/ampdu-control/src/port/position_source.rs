//! Read-only access to node positions held by the mobility model.

use crate::domain::{NodeId, Position};

/// Port that reports the current position of APs and stations.
pub trait PositionSource {
    /// Current position of a station, if the mobility model knows it.
    fn station_position(&self, station: NodeId) -> Option<Position>;

    /// Position of an access point, if the mobility model knows it.
    fn access_point_position(&self, ap: NodeId) -> Option<Position>;
}

impl<T: PositionSource + ?Sized> PositionSource for &T {
    fn station_position(&self, station: NodeId) -> Option<Position> {
        (**self).station_position(station)
    }

    fn access_point_position(&self, ap: NodeId) -> Option<Position> {
        (**self).access_point_position(ap)
    }
}
