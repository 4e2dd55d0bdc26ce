mod common;

use common::{EnvGuard, run_cli};
use serde_json::Value;
use serial_test::serial;
use std::io::Write;

fn cfg_json() -> Value {
    let res = run_cli(&["cfg"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    serde_json::from_str(&res.stdout).expect("cfg prints JSON")
}

#[test]
#[serial]
fn defaults_are_reported_as_default() {
    let _env = EnvGuard::clean(&[]);
    let json = cfg_json();
    assert_eq!(json["players"]["value"], 2);
    assert_eq!(json["players"]["source"], "default");
    assert_eq!(json["winning_score"]["value"], 1000);
    assert_eq!(json["dealer_method"]["value"], "draw_jacks");
    assert_eq!(json["ai"]["value"], "baseline");
    assert!(json["seed"]["value"].is_null());
    assert_eq!(json["rules"]["value"]["hand_size"], 9);
}

#[test]
#[serial]
fn file_values_are_tracked() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "seed = 7\nplayers = 3\n\n[rules]\nwinning_score = 1500\nlast_trick_bonus = 20"
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();
    let _env = EnvGuard::clean(&[("BESIGUE_CONFIG", path.as_str())]);

    let json = cfg_json();
    assert_eq!(json["seed"]["value"], 7);
    assert_eq!(json["seed"]["source"], "file");
    assert_eq!(json["players"]["value"], 3);
    assert_eq!(json["winning_score"]["value"], 1500);
    assert_eq!(json["winning_score"]["source"], "file");
    assert_eq!(json["dealer_method"]["source"], "default");
    assert_eq!(json["rules"]["source"], "file");
    assert_eq!(json["rules"]["value"]["last_trick_bonus"], 20);
}

#[test]
#[serial]
fn env_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "seed = 7\nplayers = 3").unwrap();
    let path = file.path().to_string_lossy().to_string();
    let _env = EnvGuard::clean(&[
        ("BESIGUE_CONFIG", path.as_str()),
        ("BESIGUE_SEED", "11"),
        ("BESIGUE_DEALER", "random"),
        ("BESIGUE_WINNING_SCORE", "600"),
    ]);

    let json = cfg_json();
    assert_eq!(json["seed"]["value"], 11);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["players"]["source"], "file");
    assert_eq!(json["dealer_method"]["value"], "random");
    assert_eq!(json["dealer_method"]["source"], "env");
    assert_eq!(json["winning_score"]["value"], 600);
}

#[test]
#[serial]
fn flags_override_env() {
    let _env = EnvGuard::clean(&[("BESIGUE_SEED", "5"), ("BESIGUE_PLAYERS", "4")]);
    let from_env = run_cli(&["deal"]);
    assert!(from_env.stdout.contains("Seed: 5"));
    assert_eq!(from_env.stdout.lines().filter(|l| l.starts_with("Hand ")).count(), 4);

    let from_flags = run_cli(&["deal", "--seed", "6", "--players", "2"]);
    assert!(from_flags.stdout.contains("Seed: 6"));
    assert_eq!(from_flags.stdout.lines().filter(|l| l.starts_with("Hand ")).count(), 2);
}

#[test]
#[serial]
fn invalid_env_value_fails() {
    let _env = EnvGuard::clean(&[("BESIGUE_PLAYERS", "seven")]);
    let res = run_cli(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid players: seven"));
}

#[test]
#[serial]
fn inconsistent_rules_fail_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rules]\nhand_size = 9\nmax_held = 5").unwrap();
    let path = file.path().to_string_lossy().to_string();
    let _env = EnvGuard::clean(&[("BESIGUE_CONFIG", path.as_str())]);
    let res = run_cli(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("max_held"));
}

#[test]
#[serial]
fn unreadable_config_file_fails() {
    let _env = EnvGuard::clean(&[("BESIGUE_CONFIG", "/nonexistent/besigue.toml")]);
    let res = run_cli(&["deal", "--seed", "1"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("cannot read config file"));
}
