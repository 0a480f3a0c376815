//! The association-driven aggregation state machine.
//!
//! Each event touches one AP and the stations sharing it. There is no global
//! recomputation pass: the AP's aggregation state is kept consistent with the
//! mix of applications associated to it by the two handlers alone.
//!
//! ```text
//!   EventSource ──► handle() ──► registries ──► DeviceParameterSink
//!                        │
//!                        └──► nearest AP ──► channel push (disassociation)
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::domain::{
    nearest, AccessCategory, AccessPointRegistry, ApplicationClass, EventKind, MacAddr, NodeId,
    Position, StationRecord, StationRegistry, TopologyEvent,
};
use crate::error::{ConfigError, ControlError, ControlResult};
use crate::policy::report::RegistryReport;
use crate::port::{DeviceParameterSink, EventSource, PositionSource};

/// Verbosity from which lookups and nearest-AP computations are logged.
const DEBUG_VERBOSITY: u8 = 3;

// ---------------------------------------------------------------------------
// Adjustment
// ---------------------------------------------------------------------------

/// A parameter change the controller decided and pushed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// New A-MPDU ceiling on an access point.
    AccessPointAmpdu { ap_id: NodeId, size_bytes: u32 },
    /// New A-MPDU ceiling on a station.
    StationAmpdu { station_id: NodeId, size_bytes: u32 },
    /// Station moved to the channel of its nearest AP.
    StationChannel { station_id: NodeId, channel: u8 },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessPointAmpdu { ap_id, size_bytes } => {
                write!(f, "AP #{ap_id} max A-MPDU -> {size_bytes}")
            }
            Self::StationAmpdu {
                station_id,
                size_bytes,
            } => write!(f, "STA #{station_id} max A-MPDU -> {size_bytes}"),
            Self::StationChannel {
                station_id,
                channel,
            } => write!(f, "STA #{station_id} channel -> {channel}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Counters collected by [`AggregationController::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Events pulled from the source.
    pub events: usize,
    /// Association events among them.
    pub associations: usize,
    /// Disassociation events among them.
    pub disassociations: usize,
    /// Adjustments pushed across all events.
    pub adjustments: usize,
    /// Events whose handling returned an error.
    pub errors: usize,
}

// ---------------------------------------------------------------------------
// AggregationController
// ---------------------------------------------------------------------------

/// Central controller owning both registries.
///
/// `S` receives parameter pushes, `P` reports node positions. Every handler
/// runs to completion on `&mut self`, so no two events are ever processed
/// concurrently.
pub struct AggregationController<S, P> {
    config: ControllerConfig,
    access_points: AccessPointRegistry,
    stations: StationRegistry,
    sink: S,
    positions: P,
}

impl<S, P> AggregationController<S, P>
where
    S: DeviceParameterSink,
    P: PositionSource,
{
    /// Create a controller with empty registries.
    ///
    /// # Errors
    ///
    /// [`ControlError::Config`] if `config` fails validation.
    pub fn new(config: ControllerConfig, sink: S, positions: P) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            access_points: AccessPointRegistry::new(),
            stations: StationRegistry::new(),
            sink,
            positions,
        })
    }

    // ---- bring-up --------------------------------------------------------

    /// Register an access point and push its initial size and channel.
    ///
    /// APs are spread round-robin over the configured channels in
    /// registration order. Returns the assigned channel.
    ///
    /// # Errors
    ///
    /// - [`ControlError::AggregationMustStartEnabled`] when the policy is on
    ///   and `aggregation_enabled` is `false`
    /// - [`ControlError::DuplicateAccessPoint`] for a repeated MAC or id
    /// - [`ControlError::NodeIdInUse`] if a station already holds `id`
    pub fn add_access_point(
        &mut self,
        id: NodeId,
        mac: MacAddr,
        aggregation_enabled: bool,
    ) -> ControlResult<u8> {
        if self.config.policy_enabled && !aggregation_enabled {
            return Err(ControlError::AggregationMustStartEnabled { id });
        }
        if self.stations.get(id).is_some() {
            return Err(ControlError::NodeIdInUse { id });
        }

        let channels = self.config.channels();
        let Some(&channel) = channels.get(self.access_points.count() % channels.len().max(1))
        else {
            return Err(ConfigError::invalid_value("num_channels", "no channel available").into());
        };
        let size = if aggregation_enabled {
            self.config.max_ampdu_size
        } else {
            self.config.max_ampdu_size_when_disabled
        };

        self.access_points.register(id, mac, size, channel)?;
        if self.verbose(1) {
            info!(ap = id, mac = %mac, channel, size, "Access point installed");
        }
        self.push_ampdu(id, size);
        self.push_channel(id, channel);
        Ok(channel)
    }

    /// Register a station, give it the channel of its nearest AP and push
    /// its initial size.
    ///
    /// Delay-sensitive stations start with aggregation off, every other
    /// class starts at the configured maximum. Returns the assigned channel.
    ///
    /// # Errors
    ///
    /// - [`ControlError::DuplicateStation`] for a repeated id
    /// - [`ControlError::NodeIdInUse`] if an access point already holds `id`
    /// - [`ControlError::PositionUnavailable`] if the station or an AP has
    ///   no position
    /// - [`ControlError::NoAccessPoints`] if no AP is registered yet
    pub fn add_station(&mut self, id: NodeId, application: ApplicationClass) -> ControlResult<u8> {
        if self.stations.get(id).is_some() {
            return Err(ControlError::DuplicateStation { station_id: id });
        }
        if self.access_points.get_by_id(id).is_some() {
            return Err(ControlError::NodeIdInUse { id });
        }

        let position = self
            .positions
            .station_position(id)
            .ok_or(ControlError::PositionUnavailable { node: id })?;
        let ap_id = self.nearest_access_point(position)?;
        let channel = self
            .access_points
            .lookup_channel(ap_id)
            .ok_or(ControlError::NoAccessPoints)?;

        let size = if application.is_delay_sensitive() {
            self.config.max_ampdu_size_when_disabled
        } else {
            self.config.max_ampdu_size
        };
        self.stations
            .register(StationRecord::new(id, application, size))?;
        if self.verbose(1) {
            info!(
                station = id,
                application = %application,
                nearest_ap = ap_id,
                channel,
                size,
                "Station installed"
            );
        }
        self.push_ampdu(id, size);
        self.push_channel(id, channel);
        Ok(channel)
    }

    /// Push one A-MPDU ceiling to every AP and station and record it.
    ///
    /// With the policy enabled, every AP that still carries a delay-sensitive
    /// station is then put back to the disabled size, together with the
    /// throughput-class stations associated to it.
    ///
    /// # Errors
    ///
    /// [`ControlError::Config`] if `size_bytes` exceeds the limit of the
    /// configured 802.11 generation.
    pub fn set_all_aggregation(&mut self, size_bytes: u32) -> ControlResult<Vec<Adjustment>> {
        let limit = self.config.standard.max_ampdu_size();
        if size_bytes > limit {
            return Err(ConfigError::invalid_value(
                "max_ampdu_size",
                format!("{size_bytes} exceeds the {} limit of {limit}", self.config.standard),
            )
            .into());
        }

        let mut adjustments = Vec::new();
        let aps: Vec<(NodeId, MacAddr)> =
            self.access_points.iter().map(|r| (r.id, r.mac)).collect();
        for (ap_id, mac) in aps {
            self.set_access_point_ampdu(ap_id, &mac, size_bytes, &mut adjustments);
        }
        let stations: Vec<NodeId> = self.stations.iter().map(|r| r.station_id).collect();
        for station_id in stations {
            self.set_station_ampdu(station_id, size_bytes, &mut adjustments);
        }
        if self.config.policy_enabled {
            self.enforce_delay_sensitive_limits(&mut adjustments);
        }
        if self.verbose(1) {
            info!(size = size_bytes, nodes = adjustments.len(), "Aggregation reset on all nodes");
        }
        Ok(adjustments)
    }

    // ---- events ------------------------------------------------------------

    /// Apply one topology event and return what was pushed.
    ///
    /// # Errors
    ///
    /// [`ControlError::UnknownStation`] if the event names an unregistered
    /// station. Nothing is mutated in that case.
    pub fn handle(&mut self, event: &TopologyEvent) -> ControlResult<Vec<Adjustment>> {
        let station_id = event.station_id();
        let ap_mac = event.ap_mac();
        let adjustments = match event.kind() {
            EventKind::Association => self.handle_association(station_id, ap_mac)?,
            EventKind::Disassociation => self.handle_disassociation(station_id, ap_mac)?,
        };
        if self.verbose(1) {
            info!(
                at_secs = event.timestamp(),
                event = %event.kind(),
                adjustments = adjustments.len(),
                "\n{}",
                self.report()
            );
        }
        Ok(adjustments)
    }

    /// Station `station_id` joined the AP with MAC `ap_mac`.
    pub fn handle_association(
        &mut self,
        station_id: NodeId,
        ap_mac: MacAddr,
    ) -> ControlResult<Vec<Adjustment>> {
        let station = self
            .stations
            .get_mut(station_id)
            .ok_or(ControlError::UnknownStation { station_id })?;
        station.associate(ap_mac);
        let application = station.application;

        if self.verbose(1) {
            info!(station = station_id, ap = %ap_mac, application = %application, "Association");
        }

        let mut adjustments = Vec::new();
        if !self.config.policy_enabled {
            return Ok(adjustments);
        }
        let Some(ap) = self.access_points.get(&ap_mac).cloned() else {
            warn!(station = station_id, ap = %ap_mac, "Association to unknown AP, aggregation unchanged");
            return Ok(adjustments);
        };
        let ap_aggregating = self.config.is_aggregating(ap.max_ampdu_size);
        if self.verbose(DEBUG_VERBOSITY) {
            debug!(ap = ap.id, size = ap.max_ampdu_size, ap_aggregating, "AP lookup");
        }

        if application.is_delay_sensitive() {
            if ap_aggregating {
                let disabled = self.config.max_ampdu_size_when_disabled;
                self.set_access_point_ampdu(ap.id, &ap_mac, disabled, &mut adjustments);

                let bulk: Vec<NodeId> = self
                    .stations
                    .associated_to(&ap_mac)
                    .filter(|r| r.station_id != station_id && r.application.is_throughput_oriented())
                    .map(|r| r.station_id)
                    .collect();
                for other in bulk {
                    self.set_station_ampdu(other, disabled, &mut adjustments);
                }
                if self.verbose(1) {
                    info!(ap = ap.id, "Delay-sensitive station joined, aggregation disabled on AP");
                }
            }
        } else if application.is_throughput_oriented() {
            let size = if ap_aggregating {
                self.config.max_ampdu_size
            } else {
                self.config.max_ampdu_size_when_disabled
            };
            self.set_station_ampdu(station_id, size, &mut adjustments);
        }

        Ok(adjustments)
    }

    /// Station `station_id` left the AP with MAC `ap_mac`.
    pub fn handle_disassociation(
        &mut self,
        station_id: NodeId,
        ap_mac: MacAddr,
    ) -> ControlResult<Vec<Adjustment>> {
        let station = self
            .stations
            .get_mut(station_id)
            .ok_or(ControlError::UnknownStation { station_id })?;
        station.disassociate();
        let application = station.application;

        if self.verbose(1) {
            info!(station = station_id, ap = %ap_mac, application = %application, "Disassociation");
        }

        let mut adjustments = Vec::new();
        if self.config.policy_enabled {
            match self.access_points.get(&ap_mac).cloned() {
                None => {
                    warn!(station = station_id, ap = %ap_mac, "Disassociation from unknown AP, aggregation unchanged");
                }
                Some(ap) => {
                    if application.is_delay_sensitive() {
                        // The departing station is already detached, so it is
                        // not part of this count.
                        if self.stations.count_delay_sensitive_on(&ap_mac) == 0 {
                            let size = self.config.max_ampdu_size;
                            self.set_access_point_ampdu(ap.id, &ap_mac, size, &mut adjustments);
                            let remaining: Vec<NodeId> = self
                                .stations
                                .associated_to(&ap_mac)
                                .map(|r| r.station_id)
                                .collect();
                            for other in remaining {
                                self.set_station_ampdu(other, size, &mut adjustments);
                            }
                            if self.verbose(1) {
                                info!(ap = ap.id, "Last delay-sensitive station left, aggregation restored");
                            }
                        }
                    } else if application.is_throughput_oriented()
                        && !self.config.is_aggregating(ap.max_ampdu_size)
                    {
                        let size = self.config.max_ampdu_size;
                        self.set_station_ampdu(station_id, size, &mut adjustments);
                    }
                }
            }
        }

        if self.config.rehomes_channels() {
            self.rehome_channel(station_id, &mut adjustments);
        }

        Ok(adjustments)
    }

    /// Drain `source`, handling every event in order.
    ///
    /// Per-event errors are logged and counted; they never stop the run.
    pub fn run<E: EventSource + ?Sized>(&mut self, source: &mut E) -> RunSummary {
        let mut summary = RunSummary::default();
        while let Some(event) = source.next_event() {
            summary.events += 1;
            match event.kind() {
                EventKind::Association => summary.associations += 1,
                EventKind::Disassociation => summary.disassociations += 1,
            }
            match self.handle(&event) {
                Ok(adjustments) => summary.adjustments += adjustments.len(),
                Err(e) => {
                    warn!(
                        at_secs = event.timestamp(),
                        station = event.station_id(),
                        error = %e,
                        "Event skipped"
                    );
                    summary.errors += 1;
                }
            }
        }
        summary
    }

    // ---- accessors ---------------------------------------------------------

    /// Run-wide configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Registry of every installed access point.
    pub fn access_points(&self) -> &AccessPointRegistry {
        &self.access_points
    }

    /// Registry of every installed station.
    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Device sink receiving parameter pushes.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the device sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Position source used for nearest-AP selection.
    pub fn positions(&self) -> &P {
        &self.positions
    }

    /// Mutable access to the position source, to move stations between
    /// events.
    pub fn positions_mut(&mut self) -> &mut P {
        &mut self.positions
    }

    /// Table view of both registries.
    pub fn report(&self) -> RegistryReport<'_> {
        RegistryReport::new(&self.access_points, &self.stations)
    }

    /// Id of the AP nearest to `position`, over every registered AP.
    pub fn nearest_access_point(&self, position: Position) -> ControlResult<NodeId> {
        let mut candidates = Vec::with_capacity(self.access_points.count());
        for record in self.access_points.iter() {
            let ap_pos = self
                .positions
                .access_point_position(record.id)
                .ok_or(ControlError::PositionUnavailable { node: record.id })?;
            candidates.push((record.id, ap_pos));
        }
        let id = nearest(&candidates, position)?;
        if self.verbose(DEBUG_VERBOSITY) {
            debug!(x = position.x, y = position.y, ap = id, "Nearest AP");
        }
        Ok(id)
    }

    // ---- internals ---------------------------------------------------------

    fn enforce_delay_sensitive_limits(&mut self, adjustments: &mut Vec<Adjustment>) {
        let disabled = self.config.max_ampdu_size_when_disabled;
        let aps: Vec<(NodeId, MacAddr)> = self
            .access_points
            .iter()
            .filter(|r| self.config.is_aggregating(r.max_ampdu_size))
            .filter(|r| self.stations.count_delay_sensitive_on(&r.mac) > 0)
            .map(|r| (r.id, r.mac))
            .collect();

        for (ap_id, mac) in aps {
            self.set_access_point_ampdu(ap_id, &mac, disabled, adjustments);
            let bulk: Vec<NodeId> = self
                .stations
                .associated_to(&mac)
                .filter(|r| {
                    r.application.is_throughput_oriented() && r.max_ampdu_size != disabled
                })
                .map(|r| r.station_id)
                .collect();
            for station_id in bulk {
                self.set_station_ampdu(station_id, disabled, adjustments);
            }
            if self.verbose(1) {
                info!(ap = ap_id, "Delay-sensitive station present, aggregation kept disabled");
            }
        }
    }

    fn verbose(&self, level: u8) -> bool {
        self.config.verbose_level >= level
    }

    fn rehome_channel(&mut self, station_id: NodeId, adjustments: &mut Vec<Adjustment>) {
        let Some(position) = self.positions.station_position(station_id) else {
            warn!(station = station_id, "No position for station, channel unchanged");
            return;
        };
        let ap_id = match self.nearest_access_point(position) {
            Ok(id) => id,
            Err(e) => {
                warn!(station = station_id, error = %e, "Channel re-homing skipped");
                return;
            }
        };
        let Some(channel) = self.access_points.lookup_channel(ap_id) else {
            return;
        };
        self.push_channel(station_id, channel);
        adjustments.push(Adjustment::StationChannel {
            station_id,
            channel,
        });
        if self.verbose(1) {
            info!(station = station_id, nearest_ap = ap_id, channel, "Station re-homed");
        }
    }

    fn set_access_point_ampdu(
        &mut self,
        ap_id: NodeId,
        mac: &MacAddr,
        size_bytes: u32,
        adjustments: &mut Vec<Adjustment>,
    ) {
        self.access_points.update(mac, ap_id, size_bytes);
        self.push_ampdu(ap_id, size_bytes);
        adjustments.push(Adjustment::AccessPointAmpdu { ap_id, size_bytes });
    }

    fn set_station_ampdu(
        &mut self,
        station_id: NodeId,
        size_bytes: u32,
        adjustments: &mut Vec<Adjustment>,
    ) {
        if let Some(record) = self.stations.get_mut(station_id) {
            record.max_ampdu_size = size_bytes;
        }
        self.push_ampdu(station_id, size_bytes);
        adjustments.push(Adjustment::StationAmpdu {
            station_id,
            size_bytes,
        });
    }

    fn push_ampdu(&mut self, node: NodeId, size_bytes: u32) {
        if let Err(e) = self
            .sink
            .set_max_ampdu_size(node, &AccessCategory::ALL, size_bytes)
        {
            warn!(node, size = size_bytes, error = %e, "A-MPDU push failed");
        }
    }

    fn push_channel(&mut self, node: NodeId, channel: u8) {
        if let Err(e) = self.sink.set_channel(node, channel) {
            warn!(node, channel, error = %e, "Channel push failed");
        }
    }
}

impl<S, P> fmt::Debug for AggregationController<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationController")
            .field("config", &self.config)
            .field("access_points", &self.access_points.count())
            .field("stations", &self.stations.len())
            .finish_non_exhaustive()
    }
}
