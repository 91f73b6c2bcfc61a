use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn tally(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally_cli").unwrap();
    cmd.env("TALLY_CLI_SCRIPT", "1")
        .env("TALLY_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("household.json");
    let input = format!(
        "ledger new Household\n\
         session login asha\n\
         project add Villa\n\
         entry add income 5000 --category salary\n\
         entry voice \"spend 250 on food\"\n\
         summary balance\n\
         ledger save {}\n\
         exit\n",
        out.display()
    );

    tally(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("New ledger `Household` created"))
        .stdout(contains("Project `Villa` created"))
        .stdout(contains("₹4,750.00"));

    let json = std::fs::read_to_string(&out).unwrap();
    assert!(json.contains("\"Household\""));
    assert!(json.contains("\"food\""));
}

#[test]
fn bill_flow_submits_and_exports() {
    let home = TempDir::new().unwrap();
    let export = home.path().join("estimate.txt");
    let input = format!(
        "ledger new Studio\n\
         session login ravi\n\
         bill new\n\
         bill submit\n\
         bill set number 17\n\
         bill set customer Lakshmi\n\
         bill item set 1 particular Wardrobe\n\
         bill item set 1 width 10\n\
         bill item set 1 height 5\n\
         bill submit\n\
         bill export 17 {}\n\
         ledger save studio\n\
         exit\n",
        export.display()
    );

    tally(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Bill not submitted"))
        .stdout(contains("Bill 17 submitted for ₹62,500.00"))
        .stdout(contains("Estimate written to"));

    let text = std::fs::read_to_string(&export).unwrap();
    assert!(text.contains("Customer: Lakshmi"));
    assert!(text.contains("Wardrobe"));
    assert!(home.path().join("ledgers/studio.json").exists());
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = TempDir::new().unwrap();
    tally(&home)
        .write_stdin("ledgr list\nexit\n")
        .assert()
        .success()
        .stdout(contains("Suggestion: `ledger`?"));
}
