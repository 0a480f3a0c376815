//! Scenario subcommands: replay, validate and nearest-AP queries.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::warn;

use ampdu_control::{
    AccessPointRecord, Adjustment, DeviceCommand, EventKind, Position, PositionSource, RunSummary,
    StationRecord,
};

use crate::scenario::{Scenario, ScenarioController, Severity, Step};

/// Arguments for the replay command
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Scenario file (JSON)
    pub scenario: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Also print every command pushed to devices
    #[arg(short, long)]
    pub commands: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Scenario file (JSON)
    pub scenario: PathBuf,
}

/// Arguments for the nearest command
#[derive(Args, Debug)]
pub struct NearestArgs {
    /// Scenario file (JSON)
    pub scenario: PathBuf,

    /// X coordinate in metres
    #[arg(short, long, allow_hyphen_values = true)]
    pub x: f64,

    /// Y coordinate in metres
    #[arg(short, long, allow_hyphen_values = true)]
    pub y: f64,
}

/// Output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
    /// Compact single-line output
    Compact,
}

// ============================================================================
// Display Structs for Tables
// ============================================================================

/// One handled timeline step
#[derive(Tabled, Serialize, Debug, Clone)]
pub struct StepRow {
    #[tabled(rename = "Time (s)")]
    pub at_secs: f64,
    #[tabled(rename = "Step")]
    pub step: String,
    #[tabled(rename = "Station")]
    pub station: String,
    #[tabled(rename = "AP")]
    pub ap: String,
    #[tabled(rename = "Result")]
    pub result: String,
}

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Max A-MPDU")]
    max_ampdu: u32,
    #[tabled(rename = "Channel")]
    channel: u8,
}

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "AP ID")]
    ap_id: String,
    #[tabled(rename = "AP MAC")]
    ap_mac: String,
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Max A-MPDU")]
    max_ampdu: u32,
}

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "#")]
    seq: usize,
    #[tabled(rename = "Node")]
    node: u32,
    #[tabled(rename = "Command")]
    command: String,
}

/// Everything a replay produced, as printed with `--format json`.
#[derive(Serialize, Debug)]
pub struct ReplayReport {
    pub summary: RunSummary,
    pub steps: Vec<StepRow>,
    pub access_points: Vec<AccessPointRecord>,
    pub stations: Vec<StationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<DeviceCommand>>,
}

// ============================================================================
// Command Execution
// ============================================================================

/// Replay the scenario timeline on a controller that is already brought up.
///
/// Event errors are counted in the summary and do not stop the replay.
pub fn replay(scenario: &Scenario, ctl: &mut ScenarioController) -> (RunSummary, Vec<StepRow>) {
    let mut summary = RunSummary::default();
    let mut rows = Vec::new();

    for step in scenario.timeline() {
        let at_secs = step.at_secs();
        match step {
            Step::Move(mv) => {
                let moved = ctl.positions_mut().move_station(mv.station_id, mv.position);
                if !moved {
                    warn!(station = mv.station_id, "Move of unknown station ignored");
                }
                rows.push(StepRow {
                    at_secs,
                    step: "move".into(),
                    station: mv.station_id.to_string(),
                    ap: "-".into(),
                    result: format!("({:.1}, {:.1})", mv.position.x, mv.position.y),
                });
            }
            Step::Reset(reset) => {
                let result = match ctl.set_all_aggregation(reset.size_bytes) {
                    Ok(adj) => {
                        summary.adjustments += adj.len();
                        format!("{} adjustments, target {}", adj.len(), reset.size_bytes)
                    }
                    Err(e) => {
                        summary.errors += 1;
                        format!("error: {e}")
                    }
                };
                rows.push(StepRow {
                    at_secs,
                    step: "reset".into(),
                    station: "*".into(),
                    ap: "*".into(),
                    result,
                });
            }
            Step::Event(event) => {
                summary.events += 1;
                match event.kind() {
                    EventKind::Association => summary.associations += 1,
                    EventKind::Disassociation => summary.disassociations += 1,
                }
                let result = match ctl.handle(&event) {
                    Ok(adj) => {
                        summary.adjustments += adj.len();
                        describe(&adj)
                    }
                    Err(e) => {
                        warn!(at_secs, error = %e, "Event skipped");
                        summary.errors += 1;
                        format!("error: {e}")
                    }
                };
                rows.push(StepRow {
                    at_secs,
                    step: event.kind().to_string(),
                    station: event.station_id().to_string(),
                    ap: event.ap_mac().to_string(),
                    result,
                });
            }
        }
    }

    (summary, rows)
}

fn describe(adjustments: &[Adjustment]) -> String {
    if adjustments.is_empty() {
        return "no change".into();
    }
    adjustments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Execute the replay command
pub fn execute_replay(args: ReplayArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let mut ctl = scenario.bring_up()?;
    let bring_up_commands = ctl.sink().commands().len();

    let (summary, steps) = replay(&scenario, &mut ctl);

    match args.format {
        OutputFormat::Json => {
            let report = ReplayReport {
                summary,
                steps,
                access_points: ctl.access_points().list().to_vec(),
                stations: ctl.stations().list().to_vec(),
                commands: args.commands.then(|| ctl.sink().commands().to_vec()),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Compact => {
            for row in &steps {
                println!(
                    "{:>8.3}s {} sta={} ap={} {}",
                    row.at_secs, row.step, row.station, row.ap, row.result
                );
            }
            if args.commands {
                for cmd in ctl.sink().commands() {
                    println!("{cmd}");
                }
            }
            println!(
                "events={} adjustments={} errors={}",
                summary.events, summary.adjustments, summary.errors
            );
        }
        OutputFormat::Table => {
            println!(
                "{} Replaying {} ({} APs, {} stations, {} bring-up commands)",
                "[REPLAY]".bright_cyan().bold(),
                args.scenario.display(),
                ctl.access_points().count(),
                ctl.stations().len(),
                bring_up_commands
            );
            println!();

            if steps.is_empty() {
                println!("{}", "No events in scenario".dimmed());
            } else {
                println!("{}", Table::new(steps.clone()).with(Style::rounded()));
            }
            println!();
            print_registries(&ctl);

            if args.commands {
                println!();
                println!("{}", "Device commands:".bold());
                print_commands(ctl.sink().commands());
            }

            println!();
            print_summary(&summary);
        }
    }

    Ok(())
}

/// Execute the validate command
pub fn execute_validate(args: ValidateArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let findings = scenario.check();

    for f in &findings {
        match f.severity {
            Severity::Error => println!("{} {}", "[ERROR]".red().bold(), f.message),
            Severity::Warning => println!("{} {}", "[WARN]".yellow(), f.message),
        }
    }

    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    if errors > 0 {
        bail!("{} has {errors} error(s)", args.scenario.display());
    }

    // Bring-up catches what static checks cannot, such as missing positions.
    let ctl = scenario.bring_up()?;
    println!(
        "{} {} ({} APs, {} stations, {} events, channels {:?})",
        "[OK]".green().bold(),
        args.scenario.display(),
        ctl.access_points().count(),
        ctl.stations().len(),
        scenario.events.len(),
        ctl.config().channels()
    );
    Ok(())
}

/// Execute the nearest command
pub fn execute_nearest(args: NearestArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let ctl = scenario.bring_up()?;
    let point = Position::new(args.x, args.y);

    let ap_id = ctl.nearest_access_point(point)?;
    let Some(record) = ctl.access_points().get_by_id(ap_id) else {
        bail!("access point {ap_id} vanished from the registry");
    };
    let distance = ctl
        .positions()
        .access_point_position(ap_id)
        .map(|p| p.distance_to(&point))
        .unwrap_or_default();

    println!(
        "{} AP #{} ({}) on channel {} at {:.2} m",
        "[NEAREST]".bright_cyan().bold(),
        record.id,
        record.mac,
        record.channel,
        distance
    );
    Ok(())
}

fn print_registries(ctl: &ScenarioController) {
    println!("{}", "Access points:".bold());
    let ap_rows: Vec<AccessPointRow> = ctl
        .access_points()
        .iter()
        .map(|r| AccessPointRow {
            id: r.id,
            mac: r.mac.to_string(),
            max_ampdu: r.max_ampdu_size,
            channel: r.channel,
        })
        .collect();
    println!("{}", Table::new(ap_rows).with(Style::rounded()));

    println!("{}", "Stations:".bold());
    let sta_rows: Vec<StationRow> = ctl
        .stations()
        .iter()
        .map(|r| {
            let ap_id = r
                .ap_mac
                .and_then(|mac| ctl.access_points().lookup_id(&mac))
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            StationRow {
                id: r.station_id,
                ap_id,
                ap_mac: r.ap_mac.map_or_else(|| "-".to_string(), |m| m.to_string()),
                application: r.application.to_string(),
                max_ampdu: r.max_ampdu_size,
            }
        })
        .collect();
    println!("{}", Table::new(sta_rows).with(Style::rounded()));
}

fn print_commands(commands: &[DeviceCommand]) {
    let rows: Vec<CommandRow> = commands
        .iter()
        .enumerate()
        .map(|(i, c)| CommandRow {
            seq: i + 1,
            node: c.node(),
            command: c.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_summary(summary: &RunSummary) {
    let errors = if summary.errors > 0 {
        summary.errors.to_string().red().bold()
    } else {
        summary.errors.to_string().green()
    };
    println!(
        "{} {} events ({} associations, {} disassociations), {} adjustments, {} errors",
        "[DONE]".green().bold(),
        summary.events,
        summary.associations,
        summary.disassociations,
        summary.adjustments,
        errors
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        serde_json::from_str(
            r#"{
                "config": { "num_channels": 2 },
                "access_points": [
                    { "id": 0, "mac": "00:00:00:00:00:01", "position": { "x": 0.0, "y": 0.0 } },
                    { "id": 1, "mac": "00:00:00:00:00:02", "position": { "x": 50.0, "y": 0.0 } }
                ],
                "stations": [
                    { "id": 10, "application": "tcp_upload", "position": { "x": 5.0, "y": 0.0 } },
                    { "id": 11, "application": "voip_download", "position": { "x": 6.0, "y": 0.0 } }
                ],
                "events": [
                    { "type": "association", "station_id": 10, "ap_mac": "00:00:00:00:00:01", "at_secs": 1.0 },
                    { "type": "association", "station_id": 11, "ap_mac": "00:00:00:00:00:01", "at_secs": 2.0 },
                    { "type": "association", "station_id": 77, "ap_mac": "00:00:00:00:00:01", "at_secs": 2.5 },
                    { "type": "disassociation", "station_id": 11, "ap_mac": "00:00:00:00:00:01", "at_secs": 3.0 }
                ],
                "moves": [ { "station_id": 11, "at_secs": 2.9, "position": { "x": 45.0, "y": 0.0 } } ],
                "aggregation_resets": [ { "at_secs": 4.0, "size_bytes": 8192 } ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn replay_walks_the_whole_timeline() {
        let s = scenario();
        let mut ctl = s.bring_up().unwrap();
        let (summary, rows) = replay(&s, &mut ctl);

        assert_eq!(rows.len(), 6);
        assert_eq!(summary.events, 4);
        assert_eq!(summary.associations, 3);
        assert_eq!(summary.errors, 1);
        assert!(rows[2].result.starts_with("error"));

        // Station 11 moved next to AP1 before leaving AP0.
        assert_eq!(ctl.sink().channel(11), Some(40));
        assert_eq!(ctl.access_points().lookup_max_ampdu(0), Some(8192));
        assert_eq!(ctl.stations().get(10).unwrap().max_ampdu_size, 8192);
    }

    #[test]
    fn reset_during_voip_call_keeps_ap_disabled() {
        let mut s = scenario();
        s.aggregation_resets[0].at_secs = 2.2;
        let mut ctl = s.bring_up().unwrap();
        let (summary, rows) = replay(&s, &mut ctl);

        assert_eq!(summary.errors, 1);
        assert_eq!(rows[2].step, "reset");
        // Two APs and two stations, then AP0 and station 10 back to 0.
        assert_eq!(rows[2].result, "6 adjustments, target 8192");
        assert_eq!(ctl.access_points().lookup_max_ampdu(1), Some(8192));
        // The call ended at 3.0, so AP0 is back at the configured maximum.
        assert_eq!(ctl.access_points().lookup_max_ampdu(0), Some(65_535));
    }

    #[test]
    fn describe_lists_adjustments() {
        assert_eq!(describe(&[]), "no change");
        let text = describe(&[
            Adjustment::AccessPointAmpdu {
                ap_id: 0,
                size_bytes: 0,
            },
            Adjustment::StationChannel {
                station_id: 3,
                channel: 40,
            },
        ]);
        assert_eq!(text, "AP #0 max A-MPDU -> 0; STA #3 channel -> 40");
    }
}
