//! Integration tests for the CLI commands and argument parsing.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use std::path::{Path, PathBuf};
use streamorder::cli::{
    Cli, Commands, ComputeRequest, cmd_compute, cmd_convert, execute, load_network, run_compute,
    run_inspect,
};
use streamorder::config::Config;
use streamorder_core::{
    ConfluenceRule, EngineKind, EngineSettings, OrderReport, StreamOrder, StreamOrderError,
    is_snapshot,
};
use tempfile::TempDir;

/// Three tributaries meet at node 5 and drain through sink arc 7 (5 → 6):
/// arc 2 (two headwaters merged at node 2), arc 5 (two headwaters merged at
/// node 4) and the headwater arc 6.
const THREE_WAY_NETWORK: &str = r#"{
  "arcs": [
    { "index": 0, "upstream_node": 0, "downstream_node": 2 },
    { "index": 1, "upstream_node": 1, "downstream_node": 2 },
    { "index": 2, "upstream_node": 2, "downstream_node": 5 },
    { "index": 3, "upstream_node": 3, "downstream_node": 4 },
    { "index": 4, "upstream_node": 7, "downstream_node": 4 },
    { "index": 5, "upstream_node": 4, "downstream_node": 5 },
    { "index": 6, "upstream_node": 8, "downstream_node": 5 },
    { "index": 7, "upstream_node": 5, "downstream_node": 6 }
  ]
}"#;

const SINK: u64 = 7;

fn write_network(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn request(input: PathBuf, engine: EngineKind, rule: ConfluenceRule) -> ComputeRequest {
    ComputeRequest {
        input,
        sink: SINK,
        node: None,
        engine,
        settings: EngineSettings {
            confluence_rule: rule,
            ..EngineSettings::default()
        },
        output: None,
    }
}

fn read_report(path: &Path) -> OrderReport {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// COMPUTE
// =============================================================================

#[test]
fn test_compute_strahler() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let (report, network) =
        run_compute(&request(input, EngineKind::Strahler, ConfluenceRule::TopTwo)).unwrap();

    assert_eq!(report.engine, "strahler");
    assert_eq!(report.sink_node, 5);
    assert_eq!(report.sink_order, 3);
    assert_eq!(report.resolved, 8);
    assert!(report.stats.is_none());
    assert_eq!(network.resolved_count(), 8);
}

#[test]
fn test_compute_shreve_rules() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    for engine in [EngineKind::Shreve, EngineKind::ShreveIterative] {
        let (top_two, _) =
            run_compute(&request(input.clone(), engine, ConfluenceRule::TopTwo)).unwrap();
        assert_eq!(top_two.sink_order, 4);

        let (all, _) =
            run_compute(&request(input.clone(), engine, ConfluenceRule::AllTributaries)).unwrap();
        assert_eq!(all.sink_order, 5);
    }
}

#[test]
fn test_compute_iterative_attaches_stats() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let (report, _) = run_compute(&request(
        input,
        EngineKind::ShreveIterative,
        ConfluenceRule::TopTwo,
    ))
    .unwrap();

    let stats = report.stats.unwrap();
    assert_eq!(stats.resolved, 8);
    assert_eq!(stats.skipped, 0);
    assert_eq!(report.engine, "shreve-iterative");
}

#[test]
fn test_compute_ignores_stale_orders_in_input() {
    let dir = TempDir::new().unwrap();
    let stale = r#"{"arcs":[
        {"index":0,"upstream_node":0,"downstream_node":1,"order":9},
        {"index":1,"upstream_node":1,"downstream_node":2,"order":9}
    ]}"#;
    let input = write_network(&dir, "stale.json", stale);

    let mut req = request(input, EngineKind::Shreve, ConfluenceRule::TopTwo);
    req.sink = 1;
    let (report, _) = run_compute(&req).unwrap();
    assert_eq!(report.sink_order, 1);
}

#[test]
fn test_compute_explicit_wrong_node_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let mut req = request(input, EngineKind::Strahler, ConfluenceRule::TopTwo);
    req.node = Some(6);
    assert!(matches!(
        run_compute(&req),
        Err(StreamOrderError::InvalidTopology(_))
    ));
}

#[test]
fn test_compute_unknown_sink_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let mut req = request(input, EngineKind::Strahler, ConfluenceRule::TopTwo);
    req.sink = 99;
    assert_eq!(
        run_compute(&req).map(|(r, _)| r.sink_order),
        Err(StreamOrderError::ArcNotFound(streamorder_core::ArcId(99)))
    );
}

#[test]
fn test_compute_recursion_limit_from_settings() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let mut req = request(input, EngineKind::Shreve, ConfluenceRule::TopTwo);
    req.settings.max_recursion_depth = 1;
    assert_eq!(
        run_compute(&req).map(|(r, _)| r.sink_order),
        Err(StreamOrderError::RecursionLimitExceeded(1))
    );
}

#[test]
fn test_compute_writes_report_and_snapshot() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let mut req = request(input, EngineKind::Strahler, ConfluenceRule::TopTwo);
    let report_path = dir.path().join("report.json");
    req.output = Some(report_path.clone());
    cmd_compute(&req, false).unwrap();

    let report = read_report(&report_path);
    assert_eq!(report.sink_order, 3);
    assert_eq!(report.arcs.len(), 8);

    let snapshot_path = dir.path().join("resolved.srn");
    req.output = Some(snapshot_path.clone());
    cmd_compute(&req, false).unwrap();

    assert!(is_snapshot(&std::fs::read(&snapshot_path).unwrap()));
    let network = load_network(&snapshot_path).unwrap();
    assert_eq!(network.resolved_count(), 8);
    assert_eq!(
        network.order_of(streamorder_core::ArcId(SINK)).unwrap(),
        Some(StreamOrder::new(3))
    );
}

// =============================================================================
// INSPECT AND CONVERT
// =============================================================================

#[test]
fn test_inspect_metrics() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);

    let metrics = run_inspect(&input).unwrap();
    assert_eq!(metrics.arc_count, 8);
    assert_eq!(metrics.node_count, 9);
    assert_eq!(metrics.headwater_count, 5);
    assert_eq!(metrics.confluence_count, 3);
    assert_eq!(metrics.outlet_count, 1);
    assert_eq!(metrics.resolved_count, 0);
    assert_eq!(metrics.max_order, None);
}

#[test]
fn test_inspect_rejects_gapped_indices() {
    let dir = TempDir::new().unwrap();
    let gapped = r#"{"arcs":[
        {"index":0,"upstream_node":0,"downstream_node":1},
        {"index":2,"upstream_node":1,"downstream_node":2}
    ]}"#;
    let input = write_network(&dir, "gapped.json", gapped);

    assert!(matches!(
        run_inspect(&input),
        Err(StreamOrderError::InvalidTopology(_))
    ));
}

#[test]
fn test_inspect_rejects_loop_arc() {
    let dir = TempDir::new().unwrap();
    let looped = r#"{"arcs":[
        {"index":0,"upstream_node":0,"downstream_node":1},
        {"index":1,"upstream_node":1,"downstream_node":1},
        {"index":2,"upstream_node":1,"downstream_node":2}
    ]}"#;
    let input = write_network(&dir, "looped.json", looped);

    assert!(matches!(
        run_inspect(&input),
        Err(StreamOrderError::InvalidTopology(_))
    ));
}

#[test]
fn test_invalid_json_is_deserialization_error() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "broken.json", "{ not json");

    assert!(matches!(
        load_network(&input),
        Err(StreamOrderError::DeserializationError(_))
    ));
}

#[test]
fn test_convert_json_to_snapshot_and_back() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);
    let snapshot = dir.path().join("net.srn");
    let back = dir.path().join("back.json");

    cmd_convert(&input, &snapshot).unwrap();
    cmd_convert(&snapshot, &back).unwrap();

    assert_eq!(load_network(&back).unwrap(), load_network(&input).unwrap());
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn test_parse_compute_flags() {
    let cli = Cli::try_parse_from([
        "streamorder",
        "--json-mode",
        "compute",
        "-i",
        "net.json",
        "-s",
        "7",
        "--engine",
        "strahler",
        "--rule",
        "all",
        "--max-depth",
        "64",
    ])
    .unwrap();

    assert!(cli.json_mode);
    match cli.command {
        Commands::Compute {
            sink,
            node,
            engine,
            rule,
            max_depth,
            ..
        } => {
            assert_eq!(sink, 7);
            assert_eq!(node, None);
            assert_eq!(engine, Some(EngineKind::Strahler));
            assert_eq!(rule, Some(ConfluenceRule::AllTributaries));
            assert_eq!(max_depth, Some(64));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_rejects_unknown_engine() {
    let result = Cli::try_parse_from([
        "streamorder",
        "compute",
        "-i",
        "net.json",
        "-s",
        "0",
        "--engine",
        "horton",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_execute_uses_config_default_engine() {
    let dir = TempDir::new().unwrap();
    let input = write_network(&dir, "net.json", THREE_WAY_NETWORK);
    let output = dir.path().join("report.json");

    let config = Config::from_toml("[engine]\ndefault = \"strahler\"\n").unwrap();
    let cli = Cli::try_parse_from([
        "streamorder",
        "compute",
        "-i",
        input.to_str().unwrap(),
        "-s",
        "7",
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    execute(cli, &config).unwrap();
    let report = read_report(&output);
    assert_eq!(report.engine, "strahler");
    assert_eq!(report.sink_order, 3);
}
