use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_list_on_empty_ledger() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("bookkeep"));
    cmd.arg("handle").arg("tests/fixtures/list_command.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""statusCode":"200""#))
        .stdout(predicate::str::contains(
            "There are no unpaid debts in this group! :smile:",
        ));

    Ok(())
}

#[test]
fn test_cli_records_debt_from_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("bookkeep"));
    cmd.arg("handle").arg("tests/fixtures/record_command.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "<@U02|bob> lost 50 chips while <@U01|alice> gained 50 chips",
        ))
        .stderr(predicate::str::contains("debt recorded"));

    Ok(())
}

#[test]
fn test_cli_dialog_elicits_invalid_amount() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("bookkeep"));
    cmd.env_remove("SLACK_WEB_API_TOKEN")
        .arg("--users")
        .arg("tests/fixtures/users.json")
        .arg("handle")
        .arg("tests/fixtures/invalid_amount_dialog.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"ElicitSlot""#))
        .stdout(predicate::str::contains(r#""slotToElicit":"Amount""#))
        .stdout(predicate::str::contains(r#""Amount":null"#))
        .stdout(predicate::str::contains("abc is an invalid amount."));

    Ok(())
}

#[test]
fn test_cli_keep_alive_from_stdin() {
    let mut cmd = assert_cmd::Command::new(cargo_bin!("bookkeep"));
    cmd.arg("handle").write_stdin(r#"{"keep_alive_ping": true}"#);

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("null\n"))
        .stderr(predicate::str::contains("ping"));
}

#[test]
fn test_cli_tally_subcommand() {
    let mut cmd = Command::new(cargo_bin!("bookkeep"));
    cmd.arg("tally");

    cmd.assert().success().stdout(predicate::str::contains(
        "There are no unpaid debts in this group! :smile:",
    ));
}
