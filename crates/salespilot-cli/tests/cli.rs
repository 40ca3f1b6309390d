use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn salespilot() -> Command {
    let mut cmd = Command::cargo_bin("salespilot").unwrap();
    cmd.env_remove("ASANA_ACCESS_TOKEN").env_remove("ASANA_DONE_CUTOFF");
    cmd
}

fn write_fixture(dir: &Path) {
    fs::write(
        dir.join("projects.json"),
        r#"[{"gid": "1", "name": "Zone North (WO)"}]"#,
    )
    .unwrap();
    fs::write(dir.join("fees.json"), r#"{"ACME": {"WO": 0.1}}"#).unwrap();

    let tasks = dir.join("tasks");
    fs::create_dir(&tasks).unwrap();
    fs::write(
        tasks.join("1.json"),
        r#"{"data": [
          {
            "gid": "100",
            "name": "Kitchen",
            "modified_at": "2024-03-10T12:30:00.000Z",
            "memberships": [{"project": {"gid": "1"}, "section": {"name": "SCHEDULED"}}],
            "custom_fields": [
              {"name": "CLIENTE", "display_value": "Acme"},
              {"name": "VALOR APROBADO", "number_value": 1000},
              {"name": "GASTO MATERIALES", "number_value": 200},
              {"name": "GASTO LABOR", "number_value": 100}
            ]
          },
          {
            "gid": "101",
            "name": "Old",
            "modified_at": "2023-01-01T00:00:00.000Z",
            "memberships": [{"project": {"gid": "1"}, "section": {"name": "Done"}}]
          }
        ]}"#,
    )
    .unwrap();
}

#[test]
fn test_export_csv_from_task_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let out = dir.path().join("out").join("sales.csv");

    salespilot()
        .current_dir(dir.path())
        .args(["export", "--tasks-dir", "tasks", "--fees", "fees.json", "--done-cutoff", "2024-01-01"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 records"));

    let csv = fs::read_to_string(&out).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Project,Zone,Type,# de orden,Priority,Client,Column"));

    let row = lines.next().unwrap();
    assert!(row.starts_with("Zone North (WO),North,WO,,,Acme,SCHEDULED,,1000.00,900.00,200.00,100.00,300.00,600.00,0.6667"));
    assert!(lines.next().is_none());
}

#[test]
fn test_export_json_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    salespilot()
        .current_dir(dir.path())
        .args([
            "export",
            "--tasks-dir",
            "tasks",
            "--output",
            "sales.json",
            "--summary",
            "totals.csv",
        ])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("sales.json")).unwrap();
    let records: serde_json::Value = serde_json::from_str(&text).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Zone"], "North");
    assert_eq!(records[0]["Logical Status"], "Scheduled");

    // Keys follow the CSV column order, not the record's field order
    let key = |name: &str| text.find(&format!("\"{name}\":")).unwrap();
    assert!(key("Project") < key("Zone"));
    assert!(key("# de orden") < key("Task GID"));
    assert!(key("Paid Amount") < key("Task URL"));

    let totals = fs::read_to_string(dir.path().join("totals.csv")).unwrap();
    assert!(totals.starts_with("Table,Group,Ventas,Utilidad,Gastos,# de Orden"));
    assert!(totals.contains("WO by Zone,North,"));
}

#[test]
fn test_missing_projects_exits_with_2() {
    let dir = tempfile::tempdir().unwrap();

    salespilot()
        .current_dir(dir.path())
        .args(["export", "--tasks-dir", "tasks"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("project list not found"));
}

#[test]
fn test_missing_task_file_exits_with_3() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::remove_file(dir.path().join("tasks").join("1.json")).unwrap();

    salespilot()
        .current_dir(dir.path())
        .args(["export", "--tasks-dir", "tasks"])
        .assert()
        .code(3);
}

#[test]
fn test_missing_token_exits_with_4() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    salespilot()
        .current_dir(dir.path())
        .args(["export"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("ASANA_ACCESS_TOKEN"));
}

#[test]
fn test_invalid_fee_exits_with_4() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join("fees.json"), r#"{"ACME": {"WO": 1.5}}"#).unwrap();

    salespilot()
        .current_dir(dir.path())
        .args(["export", "--tasks-dir", "tasks", "--fees", "fees.json"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("must be in [0, 1)"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    salespilot()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "export.done_cutoff", "2024-01-01"])
        .assert()
        .success();

    salespilot()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "export.done_cutoff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"2024-01-01\""));
}
