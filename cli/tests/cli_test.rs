//! End-to-end tests for the listkeeper binary.
//!
//! Runs the compiled binary against a temp data file and checks output and
//! exit codes, the same way a shell user experiences the tool.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn listkeeper(data_file: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_listkeeper"))
        .args(args)
        .env("LISTKEEPER_DATA_FILE", data_file)
        .output()
        .expect("failed to run listkeeper binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn add_then_list_shows_the_item() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let added = listkeeper(&file, &["add", "Buy", "milk"]);
    assert!(added.status.success());
    assert_eq!(stdout(&added), "Added: [1] Buy milk\n");

    let listed = listkeeper(&file, &["list"]);
    assert!(listed.status.success());
    assert_eq!(stdout(&listed), "[ ] [1] Buy milk\n");
}

#[test]
fn list_with_no_todos_prints_placeholder() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let listed = listkeeper(&file, &["list"]);
    assert!(listed.status.success());
    assert_eq!(stdout(&listed), "No todos found.\n");
}

#[test]
fn done_marks_and_reflects_in_list() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    listkeeper(&file, &["add", "task"]);
    let done = listkeeper(&file, &["done", "1"]);
    assert!(done.status.success());
    assert_eq!(stdout(&done), "Completed: [1] task\n");

    let listed = listkeeper(&file, &["list"]);
    assert_eq!(stdout(&listed), "[x] [1] task\n");
}

#[test]
fn done_unknown_id_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let done = listkeeper(&file, &["done", "99"]);
    assert_eq!(done.status.code(), Some(1));
    assert!(stderr(&done).contains("Todo with ID 99 not found"));
}

#[test]
fn remove_deletes_the_item() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    listkeeper(&file, &["add", "a"]);
    listkeeper(&file, &["add", "b"]);

    let removed = listkeeper(&file, &["remove", "1"]);
    assert!(removed.status.success());
    assert_eq!(stdout(&removed), "Removed todo with ID 1\n");

    let listed = listkeeper(&file, &["list"]);
    assert_eq!(stdout(&listed), "[ ] [2] b\n");
}

#[test]
fn remove_unknown_id_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let removed = listkeeper(&file, &["remove", "99"]);
    assert_eq!(removed.status.code(), Some(1));
    assert!(stderr(&removed).contains("not found"));
}

#[test]
fn non_numeric_id_exits_one_with_message() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let done = listkeeper(&file, &["done", "abc"]);
    assert_eq!(done.status.code(), Some(1));
    assert!(stderr(&done).contains("Valid ID is required"));

    let removed = listkeeper(&file, &["remove", "abc"]);
    assert_eq!(removed.status.code(), Some(1));
    assert!(stderr(&removed).contains("Valid ID is required"));
}

#[test]
fn no_command_prints_usage_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let output = listkeeper(&file, &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn unrecognized_command_prints_usage_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    let output = listkeeper(&file, &["frobnicate"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn ids_continue_increasing_after_removal() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("todos.json");

    listkeeper(&file, &["add", "a"]);
    listkeeper(&file, &["add", "b"]);
    listkeeper(&file, &["add", "c"]);
    listkeeper(&file, &["remove", "2"]);

    let added = listkeeper(&file, &["add", "d"]);
    assert_eq!(stdout(&added), "Added: [4] d\n");
}
