use assert_cmd::Command;
use crossgrade_test_utils::fixture::GraderRoot;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value;

const CONFIG: &str = r#"
[submission]
package = "student"
files = ["Adder.java", "AdderTest.java"]

[crosstests]
tests = ["AdderTest.java"]
packages = ["student", "cities.model"]

[project]
scaffold = []
"#;

fn cmd(root: &GraderRoot) -> Command {
    let mut cmd = Command::cargo_bin("crossgrade").unwrap();
    cmd.arg("--root").arg(root.path());
    cmd
}

fn fixture(config: &str) -> GraderRoot {
    let root = GraderRoot::new();
    root.write("config.toml", config)
        .write("submission/Adder.java", "package student;\nclass Adder {}\n")
        .write("submission/AdderTest.java", "package student;\nclass AdderTest {}\n");
    root
}

#[test]
fn config_is_valid() {
    let root = fixture(CONFIG);
    cmd(&root)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("is valid"));
}

#[test]
fn config_show_prints_toml() {
    let root = fixture(CONFIG);
    cmd(&root)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(contains("package = \"student\""))
        .stdout(contains("[crosstests]"));
}

#[test]
fn config_rejects_unknown_section() {
    let root = fixture(&format!("{CONFIG}\n[surprise]\nkey = 1\n"));
    cmd(&root).arg("config").assert().failure();
}

#[test]
fn stage_writes_cross_test_copy() {
    let root = fixture(CONFIG);
    cmd(&root)
        .arg("stage")
        .assert()
        .success()
        .stdout(contains("AdderTest.java -> cities.model"));

    assert_eq!(
        root.read("working/src/main/java/cities/model/AdderTest.java"),
        "package cities.model;\n\nimport student.*;\nclass AdderTest {}\n"
    );
}

#[test]
fn run_failure_reports_zero_score_payload() {
    let root = fixture(CONFIG);
    let out = cmd(&root)
        .args(["run", "missing-submission", "--results-file"])
        .arg(root.path().join("results/results.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(payload["score"], 0.0);
    assert!(
        payload["output"]
            .as_str()
            .unwrap()
            .contains("missing-submission")
    );

    let written: Value =
        serde_json::from_str(&root.read("results/results.json")).expect("valid results file");
    assert_eq!(written, payload);
}

#[test]
fn run_with_missing_config_reports_payload() {
    let root = GraderRoot::new();
    cmd(&root)
        .arg("run")
        .assert()
        .success()
        .stdout(contains("\"score\":0.0"))
        .stdout(contains("failed to read config file"));
}

#[cfg(unix)]
#[test]
fn run_prints_build_output() {
    let root = fixture(&format!(
        "{CONFIG}\n[runner]\ncommand = \"sh\"\nargs = [\"-c\", \"echo '{{\\\"score\\\": 10}}'\"]\n"
    ));
    cmd(&root)
        .arg("run")
        .assert()
        .success()
        .stdout(contains("{\"score\": 10}"));
}
