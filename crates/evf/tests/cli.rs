//! End-to-end tests for the `evf` binary.
//!
//! Each test runs the real binary inside a sandbox directory holding its
//! config file and, where needed, a seeded SQLite event database.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use event_filter_rs::executor::{IndexFields, SqliteExecutor};
use event_filter_rs::EventRow;
use serde_json::Value;
use tempfile::TempDir;

const CONFIG: &str = r#"
version = 1
user_id = 42

[[managers]]
id = 7
display_code = "JS"
name = "Jane Smith"

[[managers]]
id = 19
display_code = "RBT"
"#;

struct Sandbox {
    dir: TempDir,
    config_path: PathBuf,
}

impl Sandbox {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temporary sandbox");
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, config).expect("failed to write config");
        Self { dir, config_path }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_evf"))
            .args(args)
            .env("EVF_CONFIG", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("EVF_USER_ID")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run evf")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "evf failed\nargs: {:?}\nstatus: {}\nstderr:\n{}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stderr),
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_ok(args);
        serde_json::from_str(&stdout).unwrap_or_else(|err| {
            panic!("invalid JSON for {args:?}: {err}\nstdout:\n{stdout}")
        })
    }

    fn seed_database(&self) -> PathBuf {
        let path = self.dir.path().join("events.db");
        let executor = SqliteExecutor::open(&path).unwrap();
        executor.create_schema().unwrap();

        let events = [
            ("e1", "Algebra revision", 1, 7, "101", 1_000),
            ("e2", "Chemistry practical", 2, 19, "LAB1", 2_000),
            ("e3", "Algebra homework club", 2, 7, "102", 3_000),
        ];
        for (id, title, activity, manager, room, start) in events {
            let event = EventRow {
                id: id.to_string(),
                title: title.to_string(),
                description: String::new(),
                activity_id: activity,
                location_id: None,
                manager_id: manager,
                all_day: false,
                cancelled: false,
                start_time: start,
                end_time: start + 500,
                has_changed: false,
                hash: String::new(),
            };
            let index = IndexFields {
                location_short: room.to_string(),
                ..IndexFields::default()
            };
            executor.insert_event(&event, &index).unwrap();
        }
        executor.subscribe(42, 2).unwrap();
        path
    }
}

fn ids(value: &Value) -> Vec<String> {
    value["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

// ==================== Pipeline commands ====================

#[test]
fn test_tokens_json() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&["--json", "tokens", "subscribed", "teacher:JS", "maths"]);

    assert_eq!(value["filter"], "subscribed teacher:JS maths");
    let tokens = value["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0]["type"], "subscribed");
    assert_eq!(tokens[1]["type"], "managerid");
    assert_eq!(tokens[1]["data"], 7);
    assert_eq!(tokens[2]["type"], "keyword");
    assert_eq!(tokens[2]["data"], "maths");
}

#[test]
fn test_tokens_accepts_single_quoted_filter() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&["--json", "tokens", "room:101 before:2020-01-01"]);

    let tokens = value["tokens"].as_array().unwrap();
    assert_eq!(tokens[0]["type"], "location");
    assert_eq!(tokens[1]["type"], "before");
    assert_eq!(tokens[1]["data"], "2020-01-01");
}

#[test]
fn test_query_json_uses_config_user() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&[
        "--json",
        "query",
        "--order",
        "newest",
        "subscribed",
        "during:2020-03-04",
    ]);

    assert_eq!(value["subscribedUserId"], 42);
    assert_eq!(value["after"], "2020-03-04");
    assert_eq!(value["before"], "2020-03-04");
    assert_eq!(value["orderBy"], "newest");
}

#[test]
fn test_user_flag_overrides_config() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&["--json", "--user", "5", "query", "subscribed"]);
    assert_eq!(value["subscribedUserId"], 5);
}

#[test]
fn test_compile_json() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&["--json", "compile", "title:o'clock", "teacher:RBT"]);

    let sql = value["sql"].as_str().unwrap();
    assert!(sql.starts_with("SELECT id, title"));
    assert!(sql.contains("EventsIndex MATCH"));
    assert_eq!(
        value["matchExpression"],
        "(title : \"o''clock\") AND (manager_id : \"19\")"
    );
}

#[test]
fn test_compile_table_lists_params() {
    let sandbox = Sandbox::new(CONFIG);
    let stdout = sandbox.run_ok(&["compile", "subscribed"]);

    assert!(stdout.starts_with("SELECT "));
    assert!(stdout.contains(":subscribed_user_id"));
    assert!(stdout.contains("42"));
}

// ==================== Errors ====================

#[test]
fn test_unknown_teacher_is_keyword_by_default() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&["--json", "tokens", "teacher:ZZZ"]);

    assert_eq!(value["tokens"][0]["type"], "keyword");
    assert_eq!(value["tokens"][0]["data"], "teacher:ZZZ");
}

#[test]
fn test_strict_unknown_teacher_fails() {
    let sandbox = Sandbox::new(CONFIG);
    let output = sandbox.run(&["--json", "--strict", "query", "teacher:JZ"]);

    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "FILTER_ERROR");
    let message = error["error"]["message"].as_str().unwrap();
    assert!(message.contains("JZ"));
    assert!(message.contains("Did you mean 'JS'?"));
}

#[test]
fn test_subscribed_without_user_is_config_error() {
    let sandbox = Sandbox::new("version = 1\n");
    let output = sandbox.run(&["query", "subscribed"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("user id"));
}

#[test]
fn test_invalid_config_is_config_error() {
    let sandbox = Sandbox::new("user_id = \"not a number\"\n");
    let output = sandbox.run(&["tokens", "maths"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_missing_database_is_io_error() {
    let sandbox = Sandbox::new(CONFIG);
    let missing = sandbox.dir.path().join("missing.db");
    let output = sandbox.run(&["search", "--db", missing.to_str().unwrap(), "maths"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(!missing.exists());
}

// ==================== Search ====================

#[test]
fn test_search_filters_events() {
    let sandbox = Sandbox::new(CONFIG);
    let db = sandbox.seed_database();
    let db = db.to_str().unwrap();

    let all = sandbox.run_json(&["--json", "search", "--db", db, "--order", "oldest"]);
    assert_eq!(ids(&all), vec!["e1", "e2", "e3"]);
    assert_eq!(all["total"], 3);

    let algebra = sandbox.run_json(&["--json", "search", "--db", db, "-o", "oldest", "algebra"]);
    assert_eq!(ids(&algebra), vec!["e1", "e3"]);

    let mine = sandbox.run_json(&["--json", "search", "--db", db, "-o", "newest", "subscribed"]);
    assert_eq!(ids(&mine), vec!["e3", "e2"]);

    let combined = sandbox.run_json(&[
        "--json",
        "search",
        "--db",
        db,
        "subscribed",
        "teacher:JS",
    ]);
    assert_eq!(ids(&combined), vec!["e3"]);

    let room = sandbox.run_json(&["--json", "search", "--db", db, "room:LAB1"]);
    assert_eq!(ids(&room), vec!["e2"]);
}

#[test]
fn test_search_limit() {
    let sandbox = Sandbox::new(CONFIG);
    let db = sandbox.seed_database();
    let db = db.to_str().unwrap();

    let limited = sandbox.run_json(&["--json", "search", "--db", db, "--limit", "1", "-o", "oldest"]);
    assert_eq!(ids(&limited), vec!["e1"]);
    assert_eq!(limited["total"], 3);
    assert_eq!(limited["truncated"], true);

    let table = sandbox.run_ok(&["search", "--db", db, "--limit", "1"]);
    assert!(table.contains("... and 2 more"));
}

#[test]
fn test_search_uses_config_database() {
    let sandbox = Sandbox::new(CONFIG);
    let db = sandbox.seed_database();
    let config = format!("version = 1\ndatabase = {:?}\n", db.to_str().unwrap());
    fs::write(&sandbox.config_path, config).unwrap();

    let value = sandbox.run_json(&["--json", "search", "room:101"]);
    assert_eq!(ids(&value), vec!["e1"]);
}

#[test]
fn test_hostile_filter_leaves_database_intact() {
    let sandbox = Sandbox::new(CONFIG);
    let db = sandbox.seed_database();
    let db_str = db.to_str().unwrap();

    let value = sandbox.run_json(&[
        "--json",
        "search",
        "--db",
        db_str,
        "x');",
        "DROP",
        "TABLE",
        "Events;--",
    ]);
    assert!(ids(&value).is_empty());

    let all = sandbox.run_json(&["--json", "search", "--db", db_str]);
    assert_eq!(ids(&all).len(), 3);
}

// ==================== Config ====================

#[test]
fn test_config_path_and_init() {
    let sandbox = Sandbox::new(CONFIG);
    fs::remove_file(&sandbox.config_path).unwrap();

    let path = sandbox.run_ok(&["config", "path"]);
    assert_eq!(path.trim(), sandbox.config_path.to_str().unwrap());

    let init = sandbox.run_json(&["--json", "config", "init"]);
    assert_eq!(init["status"], "created");
    assert!(sandbox.config_path.exists());

    let again = sandbox.run_json(&["--json", "config", "init"]);
    assert_eq!(again["status"], "exists");
}

#[test]
fn test_config_show_json() {
    let sandbox = Sandbox::new(CONFIG);
    let value = sandbox.run_json(&["--json", "config", "show"]);

    assert_eq!(value["exists"], true);
    assert_eq!(value["config"]["user_id"], 42);
    assert_eq!(value["config"]["managers"][1]["display_code"], "RBT");
}

#[test]
fn test_completions() {
    let sandbox = Sandbox::new(CONFIG);
    let script = sandbox.run_ok(&["completions", "bash"]);
    assert!(script.contains("evf"));
}
