use assert_cmd::Command;

/// Helper to get a Command for the monguard binary.
#[allow(deprecated)]
fn monguard_cmd() -> Command {
    Command::cargo_bin("monguard").unwrap()
}

#[test]
fn help_works() {
    monguard_cmd().arg("--help").assert().success();
}

#[test]
fn check_help_lists_formats() {
    monguard_cmd()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--var-file"))
        .stdout(predicates::str::contains("markdown"));
}
