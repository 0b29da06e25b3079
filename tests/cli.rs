use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn replayboard_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("replayboard").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path());
    cmd
}

const CIRCLES_THEN_POLYGON: &str = r#"
[[event]]
at_ms = 50
kind = "key"
key = "1"

[[event]]
at_ms = 100
kind = "click"
x = 100.0
y = 100.0

[[event]]
at_ms = 200
kind = "click"
x = 300.0
y = 200.0

[[event]]
at_ms = 300
kind = "button"
button = "save"

[[event]]
at_ms = 400
kind = "key"
key = "3"

[[event]]
at_ms = 450
kind = "click"
x = 50.0
y = 50.0

[[event]]
at_ms = 500
kind = "move"
x = 120.0
y = 60.0

[[event]]
at_ms = 550
kind = "click"
x = 150.0
y = 50.0

[[event]]
at_ms = 600
kind = "click"
x = 150.0
y = 150.0

[[event]]
at_ms = 650
kind = "key"
key = "s"

[[event]]
at_ms = 700
kind = "key"
key = "r"
"#;

#[test]
fn help_prints_about() {
    let home = TempDir::new().unwrap();
    replayboard_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Interactive drawing board with timed replay",
        ));
}

#[test]
fn no_script_prints_usage() {
    let home = TempDir::new().unwrap();
    replayboard_cmd(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("--script session.toml"));
}

#[test]
fn scripted_session_dumps_committed_shapes() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("session.toml");
    let dump = temp.path().join("board.json");
    std::fs::write(&script, CIRCLES_THEN_POLYGON).unwrap();

    replayboard_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .arg("--dump")
        .arg(&dump)
        .args(["--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 shapes committed"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&dump).unwrap()).unwrap();
    let instructions = json["instructions"].as_array().unwrap();
    assert_eq!(instructions.len(), 3);
    assert!(instructions.iter().all(|i| i["type"] == "group"));
    assert_eq!(json["timeline"].as_array().unwrap().len(), 3);
}

#[test]
fn scripted_session_renders_png() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("session.toml");
    let output = temp.path().join("board.png");
    std::fs::write(&script, CIRCLES_THEN_POLYGON).unwrap();

    replayboard_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .args(["--width", "320", "--height", "240"])
        .assert()
        .success();

    let png = std::fs::read(&output).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn invalid_script_key_fails() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("bad.toml");
    std::fs::write(&script, "[[event]]\nat_ms = 0\nkind = \"key\"\nkey = \"F1\"\n").unwrap();

    replayboard_cmd(&temp)
        .arg("--script")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}
