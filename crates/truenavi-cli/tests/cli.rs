//! Integration tests for the `truenavi` binary.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// Temporary database shared by the commands of one test.
struct TestEnv {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("truenavi.db");
        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    fn cli(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("truenavi");
        cmd.env("TRUENAVI_DB_PATH", &self.db_path)
            .env("RUST_LOG", "error")
            .env("NO_COLOR", "1");
        cmd
    }

    fn run(&self, args: &[&str]) {
        self.cli().args(args).assert().success();
    }

    /// Nodes A(0,0), B(0,1), C(0,2) joined as A - B - C, plus an unconnected
    /// node named Island.
    fn with_line() -> Self {
        let env = Self::new();
        env.run(&["node", "add", "--name", "A", "--at", "0,0"]);
        env.run(&["node", "add", "--name", "B", "--at", "0,1"]);
        env.run(&["node", "add", "--name", "C", "--at", "0,2"]);
        env.run(&["node", "add", "--name", "Island", "--at", "10,10"]);
        env.run(&["edge", "add", "--start", "A", "--end", "B"]);
        env.run(&["edge", "add", "--start", "B", "--end", "C"]);
        env
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cli()
            .args(args)
            .arg("--format")
            .arg("json")
            .output()
            .expect("run cli");
        assert!(output.status.success(), "{:?}", output);
        serde_json::from_slice(&output.stdout).expect("valid json")
    }
}

#[test]
fn route_follows_the_line() {
    let env = TestEnv::with_line();

    env.cli()
        .args(["route", "--from", "A", "--to", "C"])
        .assert()
        .success()
        .stdout(contains("Route: 2 hops, 222.39 km"))
        .stdout(contains("START A"))
        .stdout(contains("GOAL C"));
}

#[test]
fn route_as_json_reports_status() {
    let env = TestEnv::with_line();
    let result = env.json(&["route", "--from", "C", "--to", "A"]);

    assert_eq!(result["status"], "found");
    assert_eq!(result["total_distance"], 222390.0);
    let names: Vec<&str> = result["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["C", "B", "A"]);
}

#[test]
fn unreachable_route_fails() {
    let env = TestEnv::with_line();

    env.cli()
        .args(["route", "--from", "A", "--to", "Island"])
        .assert()
        .failure()
        .stdout(contains("No route: No path exists between these nodes"))
        .stderr(contains("no route from A to Island"));
}

#[test]
fn node_list_and_near() {
    let env = TestEnv::with_line();

    let nodes = env.json(&["node", "list"]);
    assert_eq!(nodes.as_array().map(Vec::len), Some(4));

    let near = env.json(&["node", "near", "--at", "0,0", "--radius-km", "120"]);
    let names: Vec<&str> = near
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn negative_coordinates_are_accepted() {
    let env = TestEnv::new();
    let node = env.json(&["node", "add", "--name", "Sydney", "--at", "-33.87,151.21"]);
    assert_eq!(node["coordinates"][0], -33.87);
}

#[test]
fn invalid_coordinates_are_rejected() {
    let env = TestEnv::new();
    env.cli()
        .args(["node", "add", "--at", "95,0"])
        .assert()
        .failure()
        .stderr(contains("latitude"));
}

#[test]
fn duplicate_edge_is_rejected() {
    let env = TestEnv::with_line();
    env.cli()
        .args(["edge", "add", "--start", "B", "--end", "A"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn edge_with_waypoint_is_longer() {
    let env = TestEnv::with_line();
    let edge = env.json(&["edge", "add", "--start", "A", "--end", "C", "--via", "1,1"]);

    assert!(edge["distance"].as_f64().unwrap() > 222390.0);
    assert_eq!(edge["geometry"].as_array().map(Vec::len), Some(3));
}

#[test]
fn moving_a_node_updates_routes() {
    let env = TestEnv::with_line();
    let c = env.json(&["node", "list"])[2]["id"]
        .as_str()
        .unwrap()
        .to_string();

    env.run(&["node", "update", &c, "--at", "0,3"]);

    let result = env.json(&["route", "--from", "A", "--to", "C"]);
    assert_eq!(result["total_distance"], 333585.0);
}

#[test]
fn removing_a_node_breaks_routes() {
    let env = TestEnv::with_line();
    let b = env.json(&["node", "list"])[1]["id"]
        .as_str()
        .unwrap()
        .to_string();

    env.run(&["node", "remove", &b]);

    env.cli()
        .args(["route", "--from", "A", "--to", "C"])
        .assert()
        .failure();
    // Dangling edges stay in the store.
    let stats = env.json(&["stats"]);
    assert_eq!(stats["edges"], 2);
    assert_eq!(stats["nodes"], 3);
}

#[test]
fn update_without_changes_fails() {
    let env = TestEnv::with_line();
    env.cli()
        .args(["node", "update", "missing"])
        .assert()
        .failure()
        .stderr(contains("nothing to update"));
}

#[test]
fn stats_reports_graph_version() {
    let env = TestEnv::with_line();
    env.cli()
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("Nodes:         4"))
        .stdout(contains("Edges:         2"))
        .stdout(contains("Graph version: 6"));
}

#[test]
fn db_flag_is_accepted_after_subcommand() {
    let env = TestEnv::new();
    let flag_db = env.db_path.with_file_name("flag.db");
    let db = flag_db.to_str().expect("utf-8 temp path");

    cargo_bin_cmd!("truenavi")
        .env_remove("TRUENAVI_DB_PATH")
        .env("NO_COLOR", "1")
        .args(["node", "add", "--name", "X", "--at", "1,1", "--db", db])
        .assert()
        .success();

    // The flag wins over TRUENAVI_DB_PATH.
    let nodes = env.json(&["node", "list", "--db", db]);
    assert_eq!(nodes.as_array().map(Vec::len), Some(1));
    assert_eq!(nodes[0]["name"], "X");
    assert_eq!(env.json(&["stats"])["nodes"], 0);
}

#[test]
fn help_lists_subcommands() {
    cargo_bin_cmd!("truenavi")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("node").and(contains("edge")).and(contains("route")));
}
