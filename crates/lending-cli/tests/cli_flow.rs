use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const EXIT_NOT_FOUND: i32 = 3;
const EXIT_INVALID_INPUT: i32 = 4;
const EXIT_DUPLICATE: i32 = 5;
const EXIT_UNAVAILABLE: i32 = 6;
const EXIT_CONFLICT: i32 = 7;
const EXIT_INTEGRITY: i32 = 8;
const EXIT_STORAGE: i32 = 9;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lending"))
}

/// Isolated XDG directories and a ledger path for one test.
struct Sandbox {
    dir: TempDir,
    ledger: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        std::fs::create_dir_all(dir.path().join("c")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("d")).expect("create data dir");
        let ledger = dir.path().join("library.json");
        Self { dir, ledger }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("c")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("d")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("LENDING_PATH")
            .env_remove("LENDING_CONFIG")
            .env_remove("LENDING_LOG");
        cmd
    }

    /// Run with `--ledger` pointing at this sandbox's ledger.
    fn run(&self, args: &[&str]) -> Output {
        let mut cmd = self.command();
        cmd.args(args).arg("--ledger").arg(&self.ledger);
        cmd.output().expect("command should run")
    }

    fn run_ok(&self, args: &[&str]) -> Output {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: stdout={}, stderr={}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_ok(args);
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }

    fn write_ledger(&self, document: &serde_json::Value) {
        std::fs::write(&self.ledger, document.to_string()).expect("write ledger");
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn seed_catalog(sandbox: &Sandbox) {
    sandbox.run_ok(&[
        "item",
        "add",
        "978-0441172719",
        "--title",
        "Dune",
        "--author",
        "Frank Herbert",
    ]);
    sandbox.run_ok(&[
        "item",
        "add",
        "978-0441104024",
        "--title",
        "Children of Dune",
        "--author",
        "Frank Herbert",
    ]);
    sandbox.run_ok(&[
        "item",
        "add",
        "978-0141439518",
        "--title",
        "Pride and Prejudice",
        "--author",
        "Jane Austen",
    ]);
    sandbox.run_ok(&["borrower", "add", "ada", "--name", "Ada Lovelace"]);
    sandbox.run_ok(&["borrower", "add", "grace", "--name", "Grace Hopper"]);
}

fn ledger_with_loan(due_at: &str) -> serde_json::Value {
    serde_json::json!({
        "format_version": 1,
        "items": {
            "i1": {
                "id": "i1",
                "title": "Dune",
                "author": "Frank Herbert",
                "available": false,
                "holder": "ada",
                "checked_out_at": "2000-01-01T00:00:00Z",
                "due_at": due_at,
                "checkout_count": 1
            },
            "i2": {
                "id": "i2",
                "title": "Emma",
                "author": "Jane Austen",
                "available": true,
                "holder": null,
                "checked_out_at": null,
                "due_at": null,
                "checkout_count": 0
            }
        },
        "borrowers": {
            "ada": {
                "id": "ada",
                "name": "Ada Lovelace",
                "holding": ["i1"],
                "history": ["i1"],
                "penalties": 0.0
            }
        },
        "loan_days": 14,
        "penalty_rate": 0.5
    })
}

#[test]
fn test_cli_init_writes_ledger_and_config() {
    let sandbox = Sandbox::new();

    let mut init = sandbox.command();
    init.arg("init").arg(&sandbox.ledger);
    let init = init.output().expect("run init");
    assert!(init.status.success(), "init failed: {}", stderr(&init));
    assert!(stdout(&init).contains("status=ok"));

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&sandbox.ledger).expect("read ledger"))
            .expect("ledger should be JSON");
    assert_eq!(document["loan_days"], 14);
    assert_eq!(document["penalty_rate"], 0.5);

    let config_path = sandbox.config_home().join("lending").join("config.toml");
    let config = std::fs::read_to_string(&config_path).expect("config should be written");
    assert!(config.contains(&sandbox.ledger.to_string_lossy().to_string()));

    // The config now points at the ledger, so --ledger is not needed.
    let mut stats = sandbox.command();
    stats.args(["stats", "--json"]);
    let stats = stats.output().expect("run stats");
    assert!(stats.status.success());
    let value: serde_json::Value = serde_json::from_slice(&stats.stdout).expect("stats json");
    assert_eq!(value["total_items"], 0);
}

#[test]
fn test_cli_init_refuses_existing_ledger() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["init"]);

    let again = sandbox.run(&["init"]);
    assert_eq!(again.status.code(), Some(EXIT_INVALID_INPUT));
    assert!(stderr(&again).contains("already exists"));
}

#[test]
fn test_cli_default_ledger_lives_in_xdg_data_home() {
    let sandbox = Sandbox::new();
    let mut init = sandbox.command();
    init.args(["init", "--timezone", "Europe/Paris"]);
    let init = init.output().expect("run init");
    assert!(init.status.success(), "init failed: {}", stderr(&init));

    let expected = sandbox.data_home().join("lending").join("library.json");
    assert!(expected.exists());

    let config_path = sandbox.config_home().join("lending").join("config.toml");
    let config = std::fs::read_to_string(config_path).expect("config should be written");
    assert!(config.contains("Europe/Paris"));
}

#[test]
fn test_cli_missing_ledger_is_created_on_first_use() {
    let sandbox = Sandbox::new();
    assert!(!sandbox.ledger.exists());

    let value = sandbox.json(&["item", "list", "--json"]);
    assert_eq!(value, serde_json::json!([]));
    assert!(sandbox.ledger.exists());
}

#[test]
fn test_cli_checkout_return_flow() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);

    let checkout = sandbox.run_ok(&["checkout", "978-0441172719", "ada"]);
    let text = stdout(&checkout);
    assert!(text.contains("status=ok"));
    assert!(text.contains("borrower=ada"));
    assert!(text.contains("due_at="));

    let item = sandbox.json(&["item", "show", "978-0441172719", "--json"]);
    assert_eq!(item["available"], false);
    assert_eq!(item["holder"], "ada");
    assert_eq!(item["checkout_count"], 1);
    assert_eq!(item["overdue"], false);

    let available = sandbox.json(&["item", "list", "--available", "--json"]);
    let ids: Vec<&str> = available
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["978-0141439518", "978-0441104024"]);

    let returned = sandbox.run_ok(&["return", "978-0441172719"]);
    let text = stdout(&returned);
    assert!(text.contains("late_days=0"));
    assert!(text.contains("penalty=0.00"));

    let ada = sandbox.json(&["borrower", "show", "ada", "--json"]);
    assert_eq!(ada["holding"], serde_json::json!([]));
    assert_eq!(ada["history"], serde_json::json!(["978-0441172719"]));
    assert_eq!(ada["penalties"], 0.0);

    let show = sandbox.run_ok(&["item", "show", "978-0441172719"]);
    assert!(stdout(&show).contains("status=available"));
}

#[test]
fn test_cli_errors_map_to_exit_codes() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);
    sandbox.run_ok(&["checkout", "978-0441172719", "ada"]);

    let unavailable = sandbox.run(&["checkout", "978-0441172719", "grace"]);
    assert_eq!(unavailable.status.code(), Some(EXIT_UNAVAILABLE));
    assert!(stderr(&unavailable).starts_with("error="));

    let duplicate = sandbox.run(&[
        "item", "add", "978-0441172719", "--title", "Dune", "--author", "Frank Herbert",
    ]);
    assert_eq!(duplicate.status.code(), Some(EXIT_DUPLICATE));

    let duplicate_borrower = sandbox.run(&["borrower", "add", "ada", "--name", "Ada"]);
    assert_eq!(duplicate_borrower.status.code(), Some(EXIT_DUPLICATE));

    let unknown_item = sandbox.run(&["checkout", "nope", "ada"]);
    assert_eq!(unknown_item.status.code(), Some(EXIT_NOT_FOUND));

    let unknown_borrower = sandbox.run(&["checkout", "978-0141439518", "nobody"]);
    assert_eq!(unknown_borrower.status.code(), Some(EXIT_NOT_FOUND));

    let not_on_loan = sandbox.run(&["return", "978-0141439518"]);
    assert_eq!(not_on_loan.status.code(), Some(EXIT_NOT_FOUND));

    let held = sandbox.run(&["item", "remove", "978-0441172719"]);
    assert_eq!(held.status.code(), Some(EXIT_CONFLICT));
    assert!(stderr(&held).contains("hint="));

    // Failed operations leave the ledger as it was.
    let stats = sandbox.json(&["stats", "--json"]);
    assert_eq!(stats["total_items"], 3);
    assert_eq!(stats["checked_out_items"], 1);
}

#[test]
fn test_cli_remove_available_item() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);

    let removed = sandbox.run_ok(&["item", "remove", "978-0141439518"]);
    assert!(stdout(&removed).contains("title=Pride and Prejudice"));

    let missing = sandbox.run(&["item", "show", "978-0141439518"]);
    assert_eq!(missing.status.code(), Some(EXIT_NOT_FOUND));
}

#[test]
fn test_cli_add_without_fields_and_no_input_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["item", "add", "i1", "--title", "Emma", "--no-input"]);
    assert_eq!(output.status.code(), Some(EXIT_INVALID_INPUT));
    assert!(stderr(&output).contains("--author"));

    let blank = sandbox.run(&["borrower", "add", "ada", "--name", "   "]);
    assert_eq!(blank.status.code(), Some(EXIT_INVALID_INPUT));
}

#[test]
fn test_cli_search_fields() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);

    let by_author = sandbox.json(&["search", "author", "herbert", "--json"]);
    assert_eq!(by_author.as_array().expect("array").len(), 2);

    let by_title = sandbox.json(&["search", "title", "PRIDE", "--json"]);
    assert_eq!(by_title[0]["id"], "978-0141439518");

    let by_id = sandbox.json(&["search", "isbn", "978-0441104024", "--json"]);
    assert_eq!(by_id[0]["title"], "Children of Dune");

    let partial_id = sandbox.json(&["search", "id", "0441", "--json"]);
    assert_eq!(partial_id, serde_json::json!([]));

    let none = sandbox.json(&["search", "title", "zzz", "--json"]);
    assert_eq!(none, serde_json::json!([]));

    let bad_field = sandbox.run(&["search", "publisher", "x"]);
    assert_eq!(bad_field.status.code(), Some(EXIT_INVALID_INPUT));
}

#[test]
fn test_cli_plain_listing_rows() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);
    sandbox.run_ok(&["checkout", "978-0441104024", "grace"]);

    let output = sandbox.run_ok(&["item", "list"]);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "lending items");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("978-0141439518 Pride and Prejudice Jane Austen - -"));
    assert!(lines[2].starts_with("978-0441104024 Children of Dune Frank Herbert grace "));

    let borrowers = sandbox.run_ok(&["borrower", "list"]);
    let text = stdout(&borrowers);
    assert!(text.contains("ada Ada Lovelace 0 0.00"));
    assert!(text.contains("grace Grace Hopper 1 0.00"));

    let quiet = sandbox.run_ok(&["item", "list", "--quiet"]);
    assert_eq!(stdout(&quiet).lines().count(), 3);
}

#[test]
fn test_cli_stats_leaders() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);

    let empty = sandbox.json(&["stats", "--json"]);
    assert!(empty["most_borrowed"].is_null());
    assert!(empty["most_active"].is_null());

    sandbox.run_ok(&["checkout", "978-0441172719", "ada"]);
    sandbox.run_ok(&["return", "978-0441172719"]);
    sandbox.run_ok(&["checkout", "978-0441172719", "grace"]);
    sandbox.run_ok(&["checkout", "978-0141439518", "grace"]);

    let stats = sandbox.json(&["stats", "--json"]);
    assert_eq!(stats["total_items"], 3);
    assert_eq!(stats["available_items"], 1);
    assert_eq!(stats["checked_out_items"], 2);
    assert_eq!(stats["total_borrowers"], 2);
    assert_eq!(stats["most_borrowed"]["id"], "978-0441172719");
    assert_eq!(stats["most_borrowed"]["checkouts"], 2);
    assert_eq!(stats["most_active"]["id"], "grace");

    let plain = sandbox.run_ok(&["stats"]);
    assert!(stdout(&plain).contains("most_borrowed=978-0441172719"));
}

#[test]
fn test_cli_config_show_and_set() {
    let sandbox = Sandbox::new();

    let shown = sandbox.json(&["config", "show", "--json"]);
    assert_eq!(shown["loan_days"], 14);
    assert_eq!(shown["penalty_rate"], 0.5);
    assert_eq!(shown["ledger_source"], "flag");

    sandbox.run_ok(&["config", "set", "--loan-days", "21", "--penalty-rate", "0.25"]);
    let shown = sandbox.json(&["config", "show", "--json"]);
    assert_eq!(shown["loan_days"], 21);
    assert_eq!(shown["penalty_rate"], 0.25);

    let zero = sandbox.run(&["config", "set", "--loan-days", "0"]);
    assert_eq!(zero.status.code(), Some(EXIT_INVALID_INPUT));

    let negative = sandbox.run(&["config", "set", "--penalty-rate", "-1"]);
    assert_eq!(negative.status.code(), Some(EXIT_INVALID_INPUT));

    // A rejected rate leaves a valid duration in the same call unapplied.
    let mixed = sandbox.run(&["config", "set", "--loan-days", "7", "--penalty-rate", "-1"]);
    assert_eq!(mixed.status.code(), Some(EXIT_INVALID_INPUT));

    let nothing = sandbox.run(&["config", "set"]);
    assert_eq!(nothing.status.code(), Some(EXIT_INVALID_INPUT));

    let shown = sandbox.json(&["config", "show", "--json"]);
    assert_eq!(shown["loan_days"], 21);
    assert_eq!(shown["penalty_rate"], 0.25);
}

#[test]
fn test_cli_config_set_rejects_oversized_loan_days() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);

    let huge = sandbox.run(&["config", "set", "--loan-days", "4000000000"]);
    assert_eq!(huge.status.code(), Some(EXIT_INVALID_INPUT));
    assert!(stderr(&huge).contains("too large"));

    let shown = sandbox.json(&["config", "show", "--json"]);
    assert_eq!(shown["loan_days"], 14);
    sandbox.run_ok(&["checkout", "978-0441172719", "ada"]);
}

#[test]
fn test_cli_penalty_rate_keeps_every_digit() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["config", "set", "--penalty-rate", "0.123456789012345678"]);

    let raw = std::fs::read_to_string(&sandbox.ledger).expect("read ledger");
    assert!(raw.contains("0.123456789012345678"));
    let shown = sandbox.json(&["config", "show", "--json"]);
    assert_eq!(shown["penalty_rate"].to_string(), "0.123456789012345678");
}

#[test]
fn test_cli_ids_are_trimmed_everywhere() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["item", "add", " b1", "--title", "Emma", "--author", "Jane Austen"]);
    sandbox.run_ok(&["borrower", "add", "u1 ", "--name", "Ada"]);

    sandbox.run_ok(&["checkout", " b1", " u1"]);
    let item = sandbox.json(&["item", "show", "b1 ", "--json"]);
    assert_eq!(item["id"], "b1");
    assert_eq!(item["holder"], "u1");
    let borrower = sandbox.json(&["borrower", "show", " u1", "--json"]);
    assert_eq!(borrower["holding"], serde_json::json!(["b1"]));

    sandbox.run_ok(&["return", " b1 "]);
    sandbox.run_ok(&["item", "remove", " b1"]);

    let blank = sandbox.run(&["return", "  "]);
    assert_eq!(blank.status.code(), Some(EXIT_INVALID_INPUT));
}

#[test]
fn test_cli_overdue_and_late_return() {
    let sandbox = Sandbox::new();
    sandbox.write_ledger(&ledger_with_loan("2000-01-15T00:00:00Z"));

    let overdue = sandbox.json(&["overdue", "--json"]);
    let overdue = overdue.as_array().expect("array");
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0]["id"], "i1");
    assert_eq!(overdue[0]["overdue"], true);

    let listed = sandbox.json(&["item", "list", "--overdue", "--json"]);
    assert_eq!(listed.as_array().expect("array").len(), 1);

    sandbox.run_ok(&["return", "i1"]);
    let ada = sandbox.json(&["borrower", "show", "ada", "--json"]);
    let penalties = ada["penalties"].as_f64().expect("penalties number");
    assert!(penalties > 0.0);

    let overdue = sandbox.json(&["overdue", "--json"]);
    assert_eq!(overdue, serde_json::json!([]));
}

#[test]
fn test_cli_check_reports_and_blocks_inconsistent_ledger() {
    let sandbox = Sandbox::new();
    let mut document = ledger_with_loan("2000-01-15T00:00:00Z");
    document["items"]["i1"]["holder"] = serde_json::json!("ghost");
    sandbox.write_ledger(&document);

    let check = sandbox.run(&["check"]);
    assert_eq!(check.status.code(), Some(EXIT_INTEGRITY));
    let text = stderr(&check);
    assert!(text.contains("Integrity check: FAILED"));
    assert!(text.contains("ghost"));

    let report = sandbox.run(&["check", "--json"]);
    assert_eq!(report.status.code(), Some(EXIT_INTEGRITY));
    let value: serde_json::Value = serde_json::from_slice(&report.stdout).expect("check json");
    assert_eq!(value["ok"], false);

    // Queries still work; mutations are refused.
    sandbox.run_ok(&["item", "list", "--json"]);
    let blocked = sandbox.run(&["borrower", "add", "bob", "--name", "Bob"]);
    assert_eq!(blocked.status.code(), Some(EXIT_INTEGRITY));
}

#[test]
fn test_cli_check_names_contradictory_item_record() {
    let sandbox = Sandbox::new();
    let mut document = ledger_with_loan("2000-01-15T00:00:00Z");
    document["items"]["i2"]["available"] = serde_json::json!(false);
    sandbox.write_ledger(&document);

    let report = sandbox.run(&["check", "--json"]);
    assert_eq!(report.status.code(), Some(EXIT_INTEGRITY));
    let value: serde_json::Value = serde_json::from_slice(&report.stdout).expect("check json");
    let issues = value["issues"].as_array().expect("issues array");
    assert_eq!(issues.len(), 1);
    let issue = issues[0].as_str().expect("issue text");
    assert!(issue.contains("\"i2\""));
    assert!(issue.contains("availability flag"));

    let blocked = sandbox.run(&["checkout", "i2", "ada"]);
    assert_eq!(blocked.status.code(), Some(EXIT_INTEGRITY));
}

#[test]
fn test_cli_check_ok() {
    let sandbox = Sandbox::new();
    seed_catalog(&sandbox);
    let check = sandbox.run_ok(&["check"]);
    assert!(stdout(&check).contains("Integrity check: OK"));
}

#[test]
fn test_cli_corrupt_ledger_is_storage_error() {
    let sandbox = Sandbox::new();
    std::fs::write(&sandbox.ledger, "{ not json").expect("write ledger");

    let output = sandbox.run(&["item", "list"]);
    assert_eq!(output.status.code(), Some(EXIT_STORAGE));
    // The file is left untouched for manual repair.
    assert_eq!(
        std::fs::read_to_string(&sandbox.ledger).expect("read ledger"),
        "{ not json"
    );
}

#[test]
fn test_cli_unwritable_ledger_warns_but_succeeds() {
    let sandbox = Sandbox::new();
    let blocker = sandbox.dir.path().join("blocker");
    std::fs::write(&blocker, "file, not a directory").expect("write blocker");
    let ledger = blocker.join("library.json");

    let mut cmd = sandbox.command();
    cmd.args(["item", "add", "i1", "--title", "Emma", "--author", "Jane Austen"])
        .arg("--ledger")
        .arg(&ledger);
    let output = cmd.output().expect("run add");
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("warning="));
    assert!(stdout(&output).contains("status=ok"));
}

#[test]
fn test_cli_json_and_format_conflict() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["item", "list", "--json", "--format", "plain"]);
    assert_eq!(output.status.code(), Some(EXIT_INVALID_INPUT));
}

#[test]
fn test_cli_completions() {
    let sandbox = Sandbox::new();
    let mut cmd = sandbox.command();
    cmd.args(["completions", "bash"]);
    let output = cmd.output().expect("run completions");
    assert!(output.status.success());
    assert!(stdout(&output).contains("lending"));
}

#[test]
fn test_cli_ledger_path_from_env() {
    let sandbox = Sandbox::new();
    let mut cmd = sandbox.command();
    cmd.env("LENDING_PATH", &sandbox.ledger)
        .args(["borrower", "add", "ada", "--name", "Ada Lovelace"]);
    let output = cmd.output().expect("run add");
    assert!(output.status.success());
    assert!(ledger_mentions(&sandbox.ledger, "Ada Lovelace"));
}

fn ledger_mentions(path: &Path, needle: &str) -> bool {
    std::fs::read_to_string(path)
        .map(|contents| contents.contains(needle))
        .unwrap_or(false)
}
