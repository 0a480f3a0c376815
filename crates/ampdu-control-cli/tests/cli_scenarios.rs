//! Integration tests for the scenario commands.
//!
//! All scenarios are fixed JSON documents; no randomness is involved.

use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use ampdu_control_cli::replay::{self, OutputFormat, ReplayArgs, ValidateArgs};
use ampdu_control_cli::scenario::Scenario;
use ampdu_control_cli::{Cli, Commands};

fn bundled_scenario() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join("voip_and_tcp.json")
}

fn write_scenario(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_cli_parses_replay_flags() {
    let cli = Cli::try_parse_from([
        "ampdu-control",
        "replay",
        "office.json",
        "--format",
        "json",
        "--commands",
    ])
    .unwrap();
    match cli.command {
        Commands::Replay(args) => {
            assert_eq!(args.scenario, PathBuf::from("office.json"));
            assert!(matches!(args.format, OutputFormat::Json));
            assert!(args.commands);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_cli_parses_negative_coordinates() {
    let cli =
        Cli::try_parse_from(["ampdu-control", "nearest", "s.json", "-x", "12.5", "-y", "-3"])
            .unwrap();
    match cli.command {
        Commands::Nearest(args) => {
            assert_eq!(args.x, 12.5);
            assert_eq!(args.y, -3.0);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_bundled_scenario_replays_cleanly() {
    let scenario = Scenario::load(&bundled_scenario()).unwrap();
    assert!(scenario.check().is_empty());

    let mut ctl = scenario.bring_up().unwrap();
    let (summary, rows) = replay::replay(&scenario, &mut ctl);

    assert_eq!(summary.events, 6);
    assert_eq!(summary.errors, 0);
    assert_eq!(rows.len(), 7);

    // Station 3 left AP0, so AP0 aggregates again while AP1 hosts two VoIP
    // stations and stays disabled.
    assert_eq!(ctl.access_points().lookup_max_ampdu(0), Some(65_535));
    assert_eq!(ctl.access_points().lookup_max_ampdu(1), Some(0));
    assert_eq!(ctl.stations().get(2).unwrap().max_ampdu_size, 65_535);
    assert_eq!(ctl.stations().get(4).unwrap().max_ampdu_size, 65_535);
    // Re-homed to AP1's channel after moving next to it.
    assert_eq!(ctl.sink().channel(3), Some(40));
}

#[test]
fn test_replay_command_runs_every_format() {
    for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Compact] {
        replay::execute_replay(ReplayArgs {
            scenario: bundled_scenario(),
            format,
            commands: true,
        })
        .unwrap();
    }
}

#[test]
fn test_validate_rejects_broken_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "broken.json",
        r#"{
            "config": { "channel_width_mhz": 30 },
            "access_points": [
                { "id": 0, "mac": "00:00:00:00:00:01", "position": { "x": 0.0, "y": 0.0 } },
                { "id": 0, "mac": "00:00:00:00:00:02", "position": { "x": 9.0, "y": 0.0 } }
            ]
        }"#,
    );
    let err = replay::execute_validate(ValidateArgs { scenario: path }).unwrap_err();
    assert!(err.to_string().contains("2 error(s)"));
}

#[test]
fn test_validate_catches_missing_positions_at_bring_up() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "no_aps.json",
        r#"{
            "access_points": [],
            "stations": [ { "id": 1, "position": { "x": 0.0, "y": 0.0 } } ]
        }"#,
    );
    assert!(replay::execute_validate(ValidateArgs { scenario: path }).is_err());
}

#[test]
fn test_malformed_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(&dir, "garbage.json", "{ not json");
    let err = Scenario::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("garbage.json"));
}
