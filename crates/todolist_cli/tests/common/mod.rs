use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("todolist-{nanos}-{file_name}"))
}

pub fn run(store_path: &PathBuf, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_todolist");
    Command::new(exe)
        .args(args)
        .env("TODOLIST_STORE_PATH", store_path)
        .env("TODOLIST_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run todolist")
}

/// Write a store fixture so startup seeding is skipped and ids are known.
pub fn write_store(store_path: &PathBuf, todos: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "todos": todos,
    });
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

pub fn fixture_todo(
    id: &str,
    title: &str,
    description: &str,
    due_date: Option<&str>,
    status: &str,
    created_at: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": description,
        "due_date": due_date,
        "status": status,
        "created_at": created_at,
        "updated_at": created_at,
    })
}

pub fn read_store(store_path: &PathBuf) -> serde_json::Value {
    let content = std::fs::read_to_string(store_path).expect("store file");
    serde_json::from_str(&content).expect("store JSON")
}
