use std::path::Path;
use std::process::{Command, Output};

// Run the demo binary against the given database, logging into `dir`
fn run_demo(db_path: &Path, dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_customer_demo"))
        .env("CUSTOMER_STORE_DB", db_path)
        .env("CUSTOMER_STORE_LOG_FILE", dir.join("db.log"))
        .env_remove("CUSTOMER_STORE_CONSOLE")
        .output()
        .unwrap()
}

#[test]
fn test_demo_session_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_demo(&dir.path().join("database.db"), dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cannot create a table before connecting to the database"));
    assert!(stdout.contains("Customer John."));
    assert!(stdout.contains("Customer deleted successfully."));
    assert!(stdout.contains("Customer does not exist"));

    let log = std::fs::read_to_string(dir.path().join("db.log")).unwrap();
    assert!(log.contains("Customer inserted"));
}

#[test]
fn test_demo_continues_when_database_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_demo(&dir.path().join("missing").join("database.db"), dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cannot connect to database: "));
    // Every later step still ran and reported the missing connection.
    assert!(stdout.contains("Cannot delete a customer before connecting to the database"));
    assert!(stdout.contains("Cannot disconnect from the database: no open connection"));
}
