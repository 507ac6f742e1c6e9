use std::error::Error;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn outline_prints_the_sample_project_tree() -> Result<(), Box<dyn Error>> {
    Command::cargo_bin("codebench-cli")?
        .arg("outline")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("project/")
                .and(predicate::str::contains("  src/"))
                .and(predicate::str::contains("    index.js"))
                .and(predicate::str::contains("    components/"))
                .and(predicate::str::contains("  README.md")),
        );

    Ok(())
}

#[test]
fn outline_json_emits_the_serialized_tree() -> Result<(), Box<dyn Error>> {
    Command::cargo_bin("codebench-cli")?
        .args(["outline", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"revision\"")
                .and(predicate::str::contains("index.js"))
                .and(predicate::str::contains("\"parent\"")),
        );

    Ok(())
}
