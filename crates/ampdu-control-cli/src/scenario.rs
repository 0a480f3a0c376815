//! JSON scenario files: controller configuration, topology and event script.
//!
//! ```json
//! {
//!   "config": { "num_channels": 2 },
//!   "access_points": [
//!     { "id": 0, "mac": "00:00:00:00:00:01", "position": { "x": 0.0, "y": 0.0 } }
//!   ],
//!   "stations": [
//!     { "id": 10, "application": "voip_upload", "position": { "x": 5.0, "y": 0.0 } }
//!   ],
//!   "events": [
//!     { "type": "association", "station_id": 10, "ap_mac": "00:00:00:00:00:01", "at_secs": 1.0 }
//!   ],
//!   "moves": [ { "station_id": 10, "at_secs": 2.0, "position": { "x": 40.0, "y": 0.0 } } ],
//!   "aggregation_resets": [ { "at_secs": 5.0, "size_bytes": 0 } ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ampdu_control::{
    AggregationController, ApplicationClass, ControllerConfig, MacAddr, NodeId, Position,
    RecordingSink, StaticPositions, TopologyEvent,
};

/// Controller wired to the in-memory adapters used by the CLI.
pub type ScenarioController = AggregationController<RecordingSink, StaticPositions>;

fn default_true() -> bool {
    true
}

/// An access point to install before the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPointSpec {
    pub id: NodeId,
    pub mac: MacAddr,
    pub position: Position,
    #[serde(default = "default_true")]
    pub aggregation_enabled: bool,
}

/// A station to install before the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSpec {
    pub id: NodeId,
    #[serde(default)]
    pub application: ApplicationClass,
    pub position: Position,
}

/// A station moving to a new position at a given time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMove {
    pub station_id: NodeId,
    pub at_secs: f64,
    pub position: Position,
}

/// One size pushed to every node at a given time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReset {
    pub at_secs: f64,
    pub size_bytes: u32,
}

/// A complete replayable scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: ControllerConfig,
    #[serde(default)]
    pub access_points: Vec<AccessPointSpec>,
    #[serde(default)]
    pub stations: Vec<StationSpec>,
    #[serde(default)]
    pub events: Vec<TopologyEvent>,
    #[serde(default)]
    pub moves: Vec<StationMove>,
    #[serde(default)]
    pub aggregation_resets: Vec<AggregationReset>,
}

/// One entry of the replay timeline.
#[derive(Debug, Clone)]
pub enum Step {
    Move(StationMove),
    Reset(AggregationReset),
    Event(TopologyEvent),
}

impl Step {
    pub fn at_secs(&self) -> f64 {
        match self {
            Step::Move(m) => m.at_secs,
            Step::Reset(r) => r.at_secs,
            Step::Event(e) => e.timestamp(),
        }
    }
}

/// How serious a [`Finding`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found by [`Scenario::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl Scenario {
    /// Read a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))
    }

    /// Static checks that do not need a controller.
    pub fn check(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        if let Err(e) = self.config.validate() {
            findings.push(Finding::error(e.to_string()));
        }
        if self.access_points.is_empty() {
            findings.push(Finding::error("scenario declares no access points"));
        }

        let mut ap_ids = HashSet::new();
        let mut macs = HashSet::new();
        for ap in &self.access_points {
            if !ap_ids.insert(ap.id) {
                findings.push(Finding::error(format!("duplicate access point id {}", ap.id)));
            }
            if !macs.insert(ap.mac) {
                findings.push(Finding::error(format!("duplicate access point MAC {}", ap.mac)));
            }
            if self.config.policy_enabled && !ap.aggregation_enabled {
                findings.push(Finding::error(format!(
                    "access point {} starts with aggregation disabled while the policy is on",
                    ap.id
                )));
            }
        }

        let mut sta_ids = HashSet::new();
        for sta in &self.stations {
            if !sta_ids.insert(sta.id) {
                findings.push(Finding::error(format!("duplicate station id {}", sta.id)));
            }
            if ap_ids.contains(&sta.id) {
                findings.push(Finding::error(format!(
                    "station id {} is also an access point id",
                    sta.id
                )));
            }
        }

        for ev in &self.events {
            if !sta_ids.contains(&ev.station_id()) {
                findings.push(Finding::warning(format!(
                    "{} at {}s references unknown station {}",
                    ev.kind(),
                    ev.timestamp(),
                    ev.station_id()
                )));
            }
            if !macs.contains(&ev.ap_mac()) {
                findings.push(Finding::warning(format!(
                    "{} at {}s references unknown AP {}",
                    ev.kind(),
                    ev.timestamp(),
                    ev.ap_mac()
                )));
            }
        }
        for mv in &self.moves {
            if !sta_ids.contains(&mv.station_id) {
                findings.push(Finding::warning(format!(
                    "move at {}s references unknown station {}",
                    mv.at_secs, mv.station_id
                )));
            }
        }
        let limit = self.config.standard.max_ampdu_size();
        for reset in &self.aggregation_resets {
            if reset.size_bytes > limit {
                findings.push(Finding::error(format!(
                    "aggregation reset at {}s uses {} bytes, above the {} limit",
                    reset.at_secs, reset.size_bytes, limit
                )));
            }
        }

        findings
    }

    /// Position table for every declared node.
    pub fn positions(&self) -> StaticPositions {
        let mut positions = StaticPositions::new();
        for ap in &self.access_points {
            positions.set_access_point(ap.id, ap.position);
        }
        for sta in &self.stations {
            positions.set_station(sta.id, sta.position);
        }
        positions
    }

    /// Build a controller and install every AP, then every station.
    pub fn bring_up(&self) -> Result<ScenarioController> {
        let mut ctl = AggregationController::new(
            self.config.clone(),
            RecordingSink::new(),
            self.positions(),
        )
        .context("Invalid controller configuration")?;

        for ap in &self.access_points {
            ctl.add_access_point(ap.id, ap.mac, ap.aggregation_enabled)
                .with_context(|| format!("Failed to install access point {}", ap.id))?;
        }
        for sta in &self.stations {
            ctl.add_station(sta.id, sta.application)
                .with_context(|| format!("Failed to install station {}", sta.id))?;
        }
        Ok(ctl)
    }

    /// Moves, resets and events merged in time order. Entries sharing a
    /// timestamp keep the order moves, resets, events, then file order.
    pub fn timeline(&self) -> Vec<Step> {
        let mut steps: Vec<Step> = self
            .moves
            .iter()
            .cloned()
            .map(Step::Move)
            .chain(self.aggregation_resets.iter().cloned().map(Step::Reset))
            .chain(self.events.iter().cloned().map(Step::Event))
            .collect();
        steps.sort_by(|a, b| a.at_secs().total_cmp(&b.at_secs()));
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "config": { "num_channels": 2 },
        "access_points": [
            { "id": 0, "mac": "00:00:00:00:00:01", "position": { "x": 0.0, "y": 0.0 } },
            { "id": 1, "mac": "00:00:00:00:00:02", "position": { "x": 50.0, "y": 0.0 } }
        ],
        "stations": [
            { "id": 10, "application": "tcp_upload", "position": { "x": 5.0, "y": 0.0 } },
            { "id": 11, "application": "voip_upload", "position": { "x": 6.0, "y": 0.0 } }
        ],
        "events": [
            { "type": "disassociation", "station_id": 11, "ap_mac": "00:00:00:00:00:01", "at_secs": 3.0 },
            { "type": "association", "station_id": 10, "ap_mac": "00:00:00:00:00:01", "at_secs": 1.0 },
            { "type": "association", "station_id": 11, "ap_mac": "00:00:00:00:00:01", "at_secs": 2.0 }
        ],
        "moves": [ { "station_id": 11, "at_secs": 3.0, "position": { "x": 45.0, "y": 0.0 } } ]
    }"#;

    fn sample() -> Scenario {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn sample_is_clean() {
        assert!(sample().check().is_empty());
    }

    #[test]
    fn timeline_is_time_ordered_with_moves_first() {
        let steps = sample().timeline();
        let times: Vec<f64> = steps.iter().map(Step::at_secs).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0, 3.0]);
        assert!(matches!(steps[2], Step::Move(_)));
        assert!(matches!(steps[3], Step::Event(_)));
    }

    #[test]
    fn bring_up_installs_everything() {
        let ctl = sample().bring_up().unwrap();
        assert_eq!(ctl.access_points().count(), 2);
        assert_eq!(ctl.stations().len(), 2);
        assert_eq!(ctl.sink().channel(11), Some(36));
    }

    #[test]
    fn check_reports_broken_topology() {
        let mut scenario = sample();
        scenario.access_points[1].mac = scenario.access_points[0].mac;
        scenario.stations[1].id = 10;
        scenario.config.num_channels = 0;
        let findings = scenario.check();
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        assert_eq!(errors, 3);
    }

    #[test]
    fn station_reusing_an_ap_id_is_an_error() {
        let mut scenario = sample();
        scenario.stations[0].id = 1;
        let errors: Vec<Finding> = scenario
            .check()
            .into_iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("station id 1"));
        assert!(scenario.bring_up().is_err());
    }

    #[test]
    fn unknown_references_are_warnings() {
        let mut scenario = sample();
        scenario
            .events
            .push(TopologyEvent::association(99, MacAddr::from_index(9), 4.0));
        let findings = scenario.check();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.severity == Severity::Warning));
    }
}
