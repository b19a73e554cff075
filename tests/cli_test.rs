use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_cli_prints_payload() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args([
        "qr",
        "0899999999",
        "--amount",
        "1000",
        "--merchant-name",
        "PromptPayDirect",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("000201010212"))
        .stdout(predicate::str::contains("01130066899999999"))
        .stdout(predicate::str::contains("54071000.00"))
        .stdout(predicate::str::contains("5915PromptPayDirect6007Bangkok6304"));

    Ok(())
}

#[test]
fn test_cli_verify_round_trips_qr_output() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(cargo_bin!())
        .args(["qr", "1234567890123"])
        .output()?;
    assert!(output.status.success());
    let payload = String::from_utf8(output.stdout)?;

    Command::new(cargo_bin!())
        .args(["verify", payload.trim()])
        .assert()
        .success()
        .stdout(predicate::str::contains("01 11"))
        .stdout(predicate::str::contains("checksum OK"));

    Ok(())
}

#[test]
fn test_cli_verify_rejects_bad_checksum() {
    Command::new(cargo_bin!())
        .args(["verify", "00020101021153037645802TH6304FFFF"])
        .assert()
        .failure();
}

#[test]
fn test_cli_qr_names_rejected_target() {
    Command::new(cargo_bin!())
        .args(["qr", "not-a-number"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-number"));
}

#[test]
fn test_cli_simulate_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("scenario.csv");
    common::write_scenario(
        &path,
        &[
            ["open", "1000", "SOMCHAI JAIDEE", "1103700012345", "TWallet1"],
            ["transfer", "1000", "somchai jaidee", "", ""],
            ["open", "500", "SOMCHAI JAIDEE", "1103700012345", "TWallet1"],
            ["transfer", "500", "ALICE SMITH", "", ""],
            ["refund", "1", "", "", ""],
        ],
    )?;

    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["simulate", "--no-delay"]).arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "reference,status,amount_thb,amount_usdt,rate",
        ))
        .stdout(predicate::str::contains("COMPLETED,1000,28.82,34.70"))
        .stdout(predicate::str::contains("FAILED,500,14.41,34.70"))
        .stderr(predicate::str::contains("Error reading scenario event"));

    Ok(())
}
