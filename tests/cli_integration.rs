//! Integration tests for the `tdl` CLI.
//!
//! Each test creates a temp directory with a todo file, runs `tdl` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Run `tdl` with an empty config so the user's own config never leaks in
fn tdl(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_tdl"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn todo_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("todo.txt");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn add_appends_and_saves() {
    let tmp = TempDir::new().unwrap();
    let todo = todo_file(&tmp, "First task\n");
    let out = tdl(
        tmp.path(),
        &["--todo", todo.to_str().unwrap(), "add", "Call", "mom", "@phone"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "2 Call mom @phone\n");
    assert_eq!(
        fs::read_to_string(&todo).unwrap(),
        "First task\nCall mom @phone\n"
    );
}

#[test]
fn add_with_date_stamps_creation_date() {
    let tmp = TempDir::new().unwrap();
    let todo = todo_file(&tmp, "");
    let out = tdl(
        tmp.path(),
        &["--todo", todo.to_str().unwrap(), "add", "--date", "(A) Pay rent"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let saved = fs::read_to_string(&todo).unwrap();
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(saved, format!("(A) {} Pay rent\n", today));
}

#[test]
fn list_filters_and_numbers() {
    let tmp = TempDir::new().unwrap();
    let todo = todo_file(
        &tmp,
        "(A) Call mom @phone\nBuy milk @errands +shopping\nx Old task\nBuy bread @errands\n",
    );
    let todo = todo.to_str().unwrap();

    let out = tdl(tmp.path(), &["--todo", todo, "list", "--context", "errands"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "2 Buy milk @errands +shopping\n4 Buy bread @errands\n"
    );

    let out = tdl(tmp.path(), &["--todo", todo, "list", "--search", "buy -milk"]);
    assert_eq!(stdout(&out), "4 Buy bread @errands\n");

    let out = tdl(tmp.path(), &["--todo", todo, "list"]);
    assert_eq!(stdout(&out).lines().count(), 4);
}

#[test]
fn list_json() {
    let tmp = TempDir::new().unwrap();
    let todo = todo_file(&tmp, "(B) Call mom @phone due:2024-05-01\n");
    let out = tdl(
        tmp.path(),
        &["--todo", todo.to_str().unwrap(), "list", "--json"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value[0]["line"], 1);
    assert_eq!(value[0]["priority"], "B");
    assert_eq!(value[0]["due"], "2024-05-01");
    assert_eq!(value[0]["contexts"][0], "phone");
}

#[test]
fn todo_file_from_config() {
    let tmp = TempDir::new().unwrap();
    let todo = todo_file(&tmp, "From config\n");
    fs::write(
        tmp.path().join("config.toml"),
        format!("[settings]\nfile = {:?}\n", todo.to_str().unwrap()),
    )
    .unwrap();
    let out = tdl(tmp.path(), &["list"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "1 From config\n");
}

#[test]
fn missing_todo_file_is_created() {
    let tmp = TempDir::new().unwrap();
    let todo = tmp.path().join("new.txt");
    let out = tdl(tmp.path(), &["--todo", todo.to_str().unwrap(), "list"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(todo.exists());
    assert_eq!(stdout(&out), "");
}

#[test]
fn missing_directory_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let todo = tmp.path().join("nope/todo.txt");
    let out = tdl(tmp.path(), &["--todo", todo.to_str().unwrap(), "list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error: "));
    assert!(stderr(&out).contains("does not exist"));
}

#[test]
fn directory_as_todo_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let out = tdl(tmp.path(), &["--todo", tmp.path().to_str().unwrap(), "list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("is a directory"));
}

#[test]
fn no_todo_file_configured() {
    let tmp = TempDir::new().unwrap();
    let out = tdl(tmp.path(), &["list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("no todo file specified"));
}

#[test]
fn bad_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[settings\n").unwrap();
    let out = tdl(tmp.path(), &["list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("could not parse"));
}

#[test]
fn show_default_bindings() {
    let tmp = TempDir::new().unwrap();
    let out = tdl(tmp.path(), &["--show-default-bindings"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.starts_with("[keys]\n"));
    let parsed: toml::Value = toml::from_str(&text).unwrap();
    assert_eq!(parsed["keys"]["down"].as_str(), Some("j, down"));
}
