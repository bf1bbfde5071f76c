use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_malformed_rows_are_skipped() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "command, payment, amount").unwrap();
    // Valid payment
    writeln!(file, "new, , 1.25").unwrap();
    // Unknown command
    writeln!(file, "refund, 1, ").unwrap();
    // Non-numeric payment id
    writeln!(file, "pre_auth, abc, ").unwrap();
    // Valid pre-auth
    writeln!(file, "pre_auth, 1, ").unwrap();

    let mut cmd = Command::new(cargo_bin!("paysm"));
    cmd.arg(file.path()).arg("--approval-rate").arg("1");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stdout(predicate::str::contains("1,PRE_AUTH,1.25"));
}

#[test]
fn test_invalid_commands_are_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "command, payment, amount").unwrap();
    // Missing amount
    writeln!(file, "new, , ").unwrap();
    // Non-positive amount
    writeln!(file, "new, , -3.0").unwrap();
    // Unknown payment
    writeln!(file, "pre_auth, 42, ").unwrap();
    // Valid payment
    writeln!(file, "new, , 5.75").unwrap();

    let mut cmd = Command::new(cargo_bin!("paysm"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error processing command"))
        .stderr(predicate::str::contains("Payment 42 not found"))
        .stdout(predicate::str::contains("1,NEW,5.75"));
}
