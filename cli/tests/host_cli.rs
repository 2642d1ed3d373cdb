//! Drives the `aerial` binary against a throwaway state directory

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const STAKE_START: i64 = 1_514_937_600;
const ONE_DAY: i64 = 86_400;

fn aerial(data_dir: &Path, now: i64, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aerial"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--now")
        .arg(now.to_string())
        .arg("--json")
        .args(args)
        .output()
        .expect("failed to run aerial")
}

fn json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout is not JSON")
}

fn init(data_dir: &Path) {
    let output = aerial(
        data_dir,
        STAKE_START,
        &[
            "init",
            "cryptorial",
            "cri",
            "0",
            "2018-Jan-01",
            "1514937600",
            "0",
            "3",
            "90",
            "100",
            "1000",
            "21000000",
            "1000",
        ],
    );
    assert!(output.status.success());
}

#[test]
fn test_payment_persists_across_runs() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("state");
    init(&data);

    let output = aerial(&data, STAKE_START, &["invoke", "Allocate", "alice", "100"]);
    assert_eq!(json(&output)["status"], 200);

    let output = aerial(
        &data,
        STAKE_START,
        &["invoke", "MakePayment", "alice", "bob", "40"],
    );
    assert_eq!(json(&output)["status"], 200);

    let output = aerial(&data, STAKE_START, &["invoke", "CheckBalance", "bob"]);
    assert_eq!(json(&output)["payload"], "40");

    let output = aerial(
        &data,
        STAKE_START,
        &["invoke", "MakePayment", "alice", "bob", "61"],
    );
    assert!(!output.status.success());
    assert_eq!(json(&output)["status"], 409);
}

#[test]
fn test_mine_pos_with_pinned_clock() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("state");
    init(&data);

    aerial(&data, STAKE_START, &["invoke", "Allocate", "alice", "1000"]);

    let later = STAKE_START + 10 * ONE_DAY;
    let output = aerial(&data, later, &["invoke", "MinePoS", "alice"]);
    assert_eq!(json(&output)["payload"], "true");

    let output = aerial(&data, later, &["invoke", "TotalSupply"]);
    assert_eq!(json(&output)["payload"], "22095");

    let output = aerial(&data, later, &["ledger", "alice"]);
    let events = json(&output);
    assert_eq!(events.as_array().map(|e| e.len()), Some(2));
    assert_eq!(events[1]["amount"], 22_095);
}

#[test]
fn test_second_init_is_rejected() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("state");
    init(&data);

    let output = aerial(
        &data,
        STAKE_START,
        &[
            "init", "other", "oth", "0", "0", "0", "0", "1", "2", "1", "1", "1", "1",
        ],
    );
    assert!(!output.status.success());
    assert_eq!(json(&output)["status"], 409);

    let output = aerial(&data, STAKE_START, &["params"]);
    assert_eq!(json(&output)["name"], "cryptorial");
}

#[test]
fn test_init_from_config_genesis() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("aerial.toml");
    let data = dir.path().join("state");
    std::fs::write(
        &config_path,
        format!(
            r#"
data_dir = "{}"

[genesis]
name = "cryptorial"
symbol = "cri"
decimals = 0
chain_start_time = "2018-Jan-01"
stake_start_time = "2018-Jan-03"
stake_min_age_days = 3
stake_max_age_days = 90
max_mint_proof_of_stake = 100
total_supply = 1000
max_total_supply = 21000000
total_initial_supply = 1000
"#,
            data.display()
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_aerial"))
        .arg("--config")
        .arg(&config_path)
        .arg("--json")
        .arg("init")
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = aerial(&data, STAKE_START, &["params"]);
    let params = json(&output);
    assert_eq!(params["stake_start_time"], STAKE_START);
    assert_eq!(params["stake_min_age"], 3 * ONE_DAY);
}
