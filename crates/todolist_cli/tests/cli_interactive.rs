mod common;

use common::{fixture_todo, temp_path, write_store};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn run_interactive(store_path: &PathBuf, input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_todolist");

    let mut child = Command::new(exe)
        .env("TODOLIST_STORE_PATH", store_path)
        .env("TODOLIST_CONFIG_PATH", temp_path("no-config.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read interactive output");

    std::fs::remove_file(store_path).ok();
    output
}

fn seeded_store(store_path: &PathBuf) {
    write_store(
        store_path,
        serde_json::json!([
            fixture_todo(
                "todo-1",
                "open item",
                "",
                Some("2025-12-31T00:00:00Z"),
                "NOT_STARTED",
                "2025-12-01T00:00:00Z",
            ),
            fixture_todo(
                "todo-2",
                "finished item",
                "",
                None,
                "DONE",
                "2025-12-02T00:00:00Z",
            ),
        ]),
    );
}

#[test]
fn interactive_help_shows_usage() {
    let store_path = temp_path("repl-help.json");
    seeded_store(&store_path);
    let output = run_interactive(&store_path, "help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_question_mark_shows_usage() {
    let store_path = temp_path("repl-question.json");
    seeded_store(&store_path);
    let output = run_interactive(&store_path, "?\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_keeps_the_session_alive() {
    let store_path = temp_path("repl-invalid.json");
    seeded_store(&store_path);
    let output = run_interactive(&store_path, "nope\nlist\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: validation"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 todo(s)"));
}

#[test]
fn interactive_add_command_succeeds() {
    let store_path = temp_path("repl-add.json");
    seeded_store(&store_path);
    let output = run_interactive(&store_path, "add \"from repl\"\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added todo: from repl"));
    assert!(stdout.contains("3 todo(s)"));
}

#[test]
fn interactive_view_state_persists_across_commands() {
    let store_path = temp_path("repl-view-state.json");
    seeded_store(&store_path);
    let output = run_interactive(&store_path, "filter done\nsort created-at\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 todo(s) | filter: DONE | sort: due_date"));
    assert!(stdout.contains("1 todo(s) | filter: DONE | sort: created_at"));
}

#[test]
fn interactive_unterminated_quote_is_rejected() {
    let store_path = temp_path("repl-quote.json");
    seeded_store(&store_path);
    let output = run_interactive(&store_path, "add \"dangling\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated quote"));
}
