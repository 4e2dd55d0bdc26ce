mod common;

use besigue_engine::logger::RoundRecord;
use common::run_cli;
use serde_json::Value;
use std::fs;

fn records(path: &std::path::Path) -> Vec<RoundRecord> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid round record"))
        .collect()
}

#[test]
fn sim_writes_one_record_per_round() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("runs").join("rounds.jsonl");
    let res = run_cli(&[
        "sim",
        "--games",
        "2",
        "--players",
        "3",
        "--seed",
        "100",
        "--winning-score",
        "300",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Game 1: seed=100"));
    assert!(res.stdout.contains("Game 2: seed=101"));

    let recs = records(&out);
    assert!(!recs.is_empty());
    assert!(recs.iter().all(|r| r.players == 3));
    assert!(recs.iter().all(|r| r.round_id.len() == "YYYYMMDD-NNNNNN".len()));
    assert!(recs.iter().all(|r| r.ts.is_some()));
    // 132 cards, 3 per trick
    assert!(recs.iter().all(|r| r.tricks == 44));
    let finished = recs.iter().filter(|r| r.result.is_some()).count();
    assert_eq!(finished, 2);
    let games: Vec<u64> = recs
        .iter()
        .map(|r| r.meta.as_ref().unwrap()["game"].as_u64().unwrap())
        .collect();
    assert!(games.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn sim_is_reproducible_for_a_seed() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    for path in [&a, &b] {
        let res = run_cli(&[
            "sim",
            "--seed",
            "8",
            "--winning-score",
            "300",
            "--output",
            path.to_str().unwrap(),
        ]);
        assert_eq!(res.code, 0);
    }
    let strip = |mut r: RoundRecord| {
        r.ts = None;
        r.round_id.clear();
        r
    };
    let ra: Vec<_> = records(&a).into_iter().map(strip).collect();
    let rb: Vec<_> = records(&b).into_iter().map(strip).collect();
    assert_eq!(ra, rb);
}

#[test]
fn stats_reads_compressed_sim_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("rounds.jsonl.zst");
    let res = run_cli(&[
        "sim",
        "--games",
        "3",
        "--seed",
        "55",
        "--ai",
        "random",
        "--winning-score",
        "300",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    assert!(fs::read(&out).unwrap().starts_with(&[0x28, 0xB5, 0x2F, 0xFD]));

    let stats = run_cli(&["stats", "--input", out.to_str().unwrap()]);
    assert_eq!(stats.code, 0, "stderr: {}", stats.stderr);
    let json: Value = serde_json::from_str(&stats.stdout).unwrap();
    assert_eq!(json["games"], 3);
    assert!(json["rounds"].as_u64().unwrap() >= 3);
    let wins: u64 = json["wins"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(wins, 3);
    assert_eq!(json["corrupted"], 0);
}

#[test]
fn stats_walks_directories_and_counts_bad_lines() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("nested").join("good.jsonl");
    let res = run_cli(&[
        "sim",
        "--seed",
        "3",
        "--winning-score",
        "300",
        "--output",
        good.to_str().unwrap(),
    ]);
    assert_eq!(res.code, 0);
    let rounds = records(&good).len() as u64;

    fs::write(dir.path().join("bad.jsonl"), "{broken\n{\"round_id\":").unwrap();
    fs::write(dir.path().join("ignored.txt"), "not a record").unwrap();

    let stats = run_cli(&["stats", "--input", dir.path().to_str().unwrap()]);
    assert_eq!(stats.code, 0, "stderr: {}", stats.stderr);
    let json: Value = serde_json::from_str(&stats.stdout).unwrap();
    assert_eq!(json["rounds"], rounds);
    assert_eq!(json["corrupted"], 1);
    assert_eq!(json["incomplete"], 1);
    assert!(stats.stderr.contains("bad.jsonl:1"));
}

#[test]
fn stats_on_only_garbage_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    fs::write(&path, "nope\nstill nope\n").unwrap();
    let res = run_cli(&["stats", "--input", path.to_str().unwrap()]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("No valid round records"));
}

#[test]
fn stats_missing_file_fails() {
    let res = run_cli(&["stats", "--input", "/nonexistent/rounds.jsonl"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Failed to read"));
}
