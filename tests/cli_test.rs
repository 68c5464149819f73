use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::path::Path;
use std::process::{Command, Output};

const TASKS: &str = "@name: Tasks\n\
                     title: text required\n\
                     status: select options=[open,closed] required\n";

fn listdsl(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_listdsl"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "listdsl=warn")
        .output()
        .expect("Failed to execute listdsl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[rstest]
#[case("init")]
#[case("check")]
#[case("fmt")]
#[case("export")]
#[case("validate-data")]
#[case("defaults")]
#[case("stats")]
#[case("info")]
fn test_help_lists_command(#[case] command: &str) {
    let temp = assert_fs::TempDir::new().unwrap();

    let output = listdsl(temp.path(), &["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(command), "missing {command}");

    let output = listdsl(temp.path(), &[command, "--help"]);
    assert!(output.status.success());
}

#[test]
fn test_init_then_check() {
    let temp = assert_fs::TempDir::new().unwrap();

    let output = listdsl(temp.path(), &["init", "--example"]);
    assert!(output.status.success());
    temp.child(".listdsl.yaml")
        .assert(predicate::str::contains("version: '1.0'").or(predicate::str::contains("version: \"1.0\"")));
    temp.child("schemas/task-tracker.dsl")
        .assert(predicate::str::starts_with("@name: Task Tracker\n"));

    let output = listdsl(temp.path(), &["init"]);
    assert!(!output.status.success());

    let output = listdsl(temp.path(), &["check"]);
    assert!(output.status.success());
    assert!(predicate::str::contains("ok    ").eval(&stdout(&output)));

    let output = listdsl(temp.path(), &["fmt", "--check", "schemas/task-tracker.dsl"]);
    assert!(output.status.success());
}

#[test]
fn test_check_fails_on_invalid_schema() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("schemas/bonus.dsl")
        .write_str("@name: Bonus\nbonus: number visible_if=tier=gold\n")
        .unwrap();

    let output = listdsl(temp.path(), &["check"]);
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("FAIL  "));
    assert!(text.contains("references unknown field 'tier'"));

    let output = listdsl(temp.path(), &["check", "--format", "json"]);
    assert!(!output.status.success());
    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reports[0]["summary"]["isValid"], false);
}

#[test]
fn test_fmt_write_rewrites_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("tasks.dsl");
    file.write_str("# tasks\n@name:   Tasks\ntitle:   text    required\n").unwrap();

    let output = listdsl(temp.path(), &["fmt", "--check", "tasks.dsl"]);
    assert!(!output.status.success());

    let output = listdsl(temp.path(), &["fmt", "--write", "tasks.dsl"]);
    assert!(output.status.success());
    file.assert("@name: Tasks\n\ntitle: text required\n");
}

#[test]
fn test_validate_data_reports_each_row() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tasks.dsl").write_str(TASKS).unwrap();
    temp.child("rows.json")
        .write_str(r#"[{"title": "", "status": "open"}, {"title": "x", "status": "bogus"}, {"title": "x", "status": "closed"}]"#)
        .unwrap();
    temp.child("good.json")
        .write_str(r#"{"title": "x", "status": "open"}"#)
        .unwrap();

    let output = listdsl(temp.path(), &["validate-data", "tasks.dsl", "rows.json"]);
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("record 0: 1 error(s)"));
    assert!(text.contains("title: Title is required"));
    assert!(text.contains("status: Status must be one of: open, closed"));
    assert!(text.contains("record 2: ok"));

    let output = listdsl(temp.path(), &["validate-data", "tasks.dsl", "good.json"]);
    assert!(output.status.success());
}

#[test]
fn test_export_and_defaults() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tasks.dsl")
        .write_str("@name: Tasks\ntitle: text required\nstatus: select options=[open,closed] default=open\n")
        .unwrap();

    let output = listdsl(temp.path(), &["export", "tasks.dsl", "--format", "json"]);
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(schema["fields"][1]["propertyKey"], "status");
    assert_eq!(schema["fields"][1]["validationRules"]["options"][1], "closed");

    let output = listdsl(temp.path(), &["export", "tasks.dsl", "-o", "tasks.json"]);
    assert!(output.status.success());
    temp.child("tasks.json").assert(predicate::str::contains("\"propertyName\": \"Title\""));

    let output = listdsl(temp.path(), &["defaults", "tasks.dsl"]);
    assert!(output.status.success());
    let values: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(values, serde_json::json!({"title": "", "status": "open"}));
}

#[test]
fn test_stats() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tasks.dsl").write_str(TASKS).unwrap();

    let output = listdsl(temp.path(), &["stats", "tasks.dsl"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Fields: 2"));
    assert!(text.contains("Required: 2"));
    assert!(text.contains("select: 1"));
}

#[rstest]
#[case("text", "\"status\": \"open\"")]
#[case("json", "\"status\": \"open\"")]
#[case("yaml", "status: open")]
fn test_defaults_output_formats(#[case] format: &str, #[case] expected: &str) {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("tasks.dsl")
        .write_str("@name: Tasks\nstatus: select options=[open,closed] default=open\n")
        .unwrap();

    let output = listdsl(temp.path(), &["defaults", "tasks.dsl", "--format", format]);
    assert!(output.status.success());
    assert!(predicate::str::contains(expected).eval(&stdout(&output)));
}
