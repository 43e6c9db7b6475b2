use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, error, info, instrument, warn};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::logging;
use crate::model::{Customer, DeleteOutcome, InsertOutcome};
use crate::schema;

const INSERT_CUSTOMER: &str =
    "INSERT INTO customers (name, password, cpf, email) VALUES (?1, ?2, ?3, ?4)";
const SELECT_BY_CPF: &str =
    "SELECT id, name, password, cpf, email FROM customers WHERE cpf = ?1";
// email is not unique; only the oldest match is reported.
const SELECT_BY_EMAIL: &str =
    "SELECT id, name, password, cpf, email FROM customers WHERE email = ?1 ORDER BY id LIMIT 1";
const DELETE_BY_CPF: &str = "DELETE FROM customers WHERE cpf = ?1";
const COUNT_CUSTOMERS: &str = "SELECT COUNT(*) FROM customers";

/// SQLite-backed store for the `customers` table.
///
/// Holds at most one connection. Every CRUD operation checks for it first and
/// fails with [`StoreError::NotConnected`] when `connect` has not succeeded.
/// Each operation also prints a short line (when `console` is on) and emits a
/// matching tracing event inside a span named after the operation.
///
/// The store does no locking of its own; share it behind a mutex if several
/// threads need it.
pub struct CustomerStore {
    config: StoreConfig,
    connection: Option<Connection>,
    console: Option<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for CustomerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerStore")
            .field("config", &self.config)
            .field("connection", &self.connection)
            .field("console", &self.console.is_some())
            .finish()
    }
}

impl CustomerStore {
    /// Create an unconnected store. The first store built in a process
    /// installs the log sink from `config.log`.
    pub fn new(config: StoreConfig) -> Self {
        logging::ensure_initialized(&config.log);
        let console = if config.console {
            let stdout: Box<dyn Write + Send> = Box::new(io::stdout());
            Some(Mutex::new(stdout))
        } else {
            None
        };
        Self {
            config,
            connection: None,
            console,
        }
    }

    /// Send console lines to `writer` instead of stdout.
    pub fn with_console_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        let writer: Box<dyn Write + Send> = Box::new(writer);
        self.console = Some(Mutex::new(writer));
        self
    }

    pub fn path(&self) -> &Path {
        &self.config.db_path
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the database file, creating it if absent. Calling this while
    /// connected replaces the existing handle.
    #[instrument(skip_all, fields(path = %self.config.db_path.display()))]
    pub fn connect(&mut self) -> Result<()> {
        match Connection::open(&self.config.db_path) {
            Ok(conn) => {
                self.connection = Some(conn);
                info!("Database connected");
                self.report("Database connected.");
                Ok(())
            }
            Err(source) => {
                self.connection = None;
                error!(error = %source, "Database cannot be connected");
                self.report(&format!("Cannot connect to database: {source}"));
                Err(StoreError::Open {
                    path: self.config.db_path.clone(),
                    source,
                })
            }
        }
    }

    #[instrument(skip_all)]
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(conn) = self.connection.take() else {
            error!("Database cannot be closed: not connected");
            self.report("Cannot disconnect from the database: no open connection");
            return Err(StoreError::NotConnected);
        };

        match conn.close() {
            Ok(()) => {
                info!("Database closed");
                self.report("Database closed.");
                Ok(())
            }
            Err((conn, source)) => {
                // The engine kept the handle open, so keep owning it.
                self.connection = Some(conn);
                Err(self.engine_failure("close the database", source))
            }
        }
    }

    /// Create the `customers` table unless it already exists.
    #[instrument(skip_all)]
    pub fn create_table(&self) -> Result<()> {
        let conn = self.connection("create a table")?;
        conn.execute_batch(&schema::customers_table().create_if_not_exists_sql())
            .map_err(|err| self.engine_failure("create the customers table", err))?;
        info!("Table was created");
        self.report("Table customers is ready.");
        Ok(())
    }

    /// Insert a customer. A CPF that is already stored yields
    /// [`InsertOutcome::Duplicate`] and leaves the table unchanged.
    #[instrument(skip_all, fields(cpf = %cpf))]
    pub fn insert_customer(
        &self,
        name: &str,
        password: &str,
        cpf: &str,
        email: &str,
    ) -> Result<InsertOutcome> {
        let conn = self.connection("insert into a table")?;
        match conn.execute(INSERT_CUSTOMER, params![name, password, cpf, email]) {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                info!(id, "Customer inserted");
                self.report(&format!("Customer {name} inserted."));
                Ok(InsertOutcome::Inserted(id))
            }
            Err(err) if is_unique_violation(&err) => {
                warn!("Customer already exists");
                self.report(&format!("CPF {cpf} already exists"));
                Ok(InsertOutcome::Duplicate)
            }
            Err(err) => Err(self.engine_failure("insert a customer", err)),
        }
    }

    /// Report whether a customer with this CPF exists.
    #[instrument(skip_all, fields(cpf = %cpf))]
    pub fn find_by_cpf(&self, cpf: &str) -> Result<bool> {
        let customer = self.fetch_one(SELECT_BY_CPF, cpf)?;
        Ok(self.report_lookup(customer))
    }

    /// Report whether any customer uses this email. Duplicate emails are
    /// allowed by the table but only the first match is considered.
    #[instrument(skip_all, fields(email = %email))]
    pub fn find_by_email(&self, email: &str) -> Result<bool> {
        let customer = self.fetch_one(SELECT_BY_EMAIL, email)?;
        Ok(self.report_lookup(customer))
    }

    /// Fetch the full row for a CPF without printing anything on success.
    #[instrument(skip_all, fields(cpf = %cpf))]
    pub fn get_by_cpf(&self, cpf: &str) -> Result<Option<Customer>> {
        let customer = self.fetch_one(SELECT_BY_CPF, cpf)?;
        debug!(found = customer.is_some(), "Customer fetched");
        Ok(customer)
    }

    #[instrument(skip_all, fields(cpf = %cpf))]
    pub fn delete_by_cpf(&self, cpf: &str) -> Result<DeleteOutcome> {
        let conn = self.connection("delete a customer")?;
        let rows = conn
            .execute(DELETE_BY_CPF, params![cpf])
            .map_err(|err| self.engine_failure("delete a customer", err))?;

        let outcome = DeleteOutcome::from_affected(rows);
        match outcome {
            DeleteOutcome::Deleted(rows) => {
                info!(rows, "Customer deleted");
                self.report("Customer deleted successfully.");
            }
            DeleteOutcome::NotRegistered => {
                warn!("Customer not deleted");
                self.report("Customer is not registered.");
            }
        }
        Ok(outcome)
    }

    #[instrument(skip_all)]
    pub fn count_customers(&self) -> Result<u64> {
        let conn = self.connection("count customers")?;
        let count: i64 = conn
            .query_row(COUNT_CUSTOMERS, [], |row| row.get(0))
            .map_err(|err| self.engine_failure("count customers", err))?;
        Ok(count as u64)
    }

    fn connection(&self, action: &str) -> Result<&Connection> {
        match &self.connection {
            Some(conn) => Ok(conn),
            None => {
                error!("Cannot {action} before connecting to the database");
                self.report(&format!("Cannot {action} before connecting to the database"));
                Err(StoreError::NotConnected)
            }
        }
    }

    fn fetch_one(&self, sql: &str, key: &str) -> Result<Option<Customer>> {
        let conn = self.connection("find a customer")?;
        conn.query_row(sql, params![key], Customer::from_row)
            .optional()
            .map_err(|err| self.engine_failure("find a customer", err))
    }

    fn report_lookup(&self, customer: Option<Customer>) -> bool {
        match customer {
            Some(customer) => {
                info!(id = customer.id, "Customer found");
                self.report(&format!("Customer {}.", customer.name));
                true
            }
            None => {
                warn!("Customer not found");
                self.report("Customer does not exist");
                false
            }
        }
    }

    fn engine_failure(&self, action: &str, err: rusqlite::Error) -> StoreError {
        error!(error = %err, "Cannot {action}");
        self.report(&format!("Cannot {action}: {err}"));
        StoreError::Sqlite(err)
    }

    fn report(&self, message: &str) {
        let Some(console) = &self.console else {
            return;
        };
        // A poisoned or failing console must not fail the operation.
        if let Ok(mut writer) = console.lock() {
            let _ = writeln!(writer, "{message}");
            let _ = writer.flush();
        }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_error(sql: &str) -> rusqlite::Error {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (k TEXT UNIQUE NOT NULL, v TEXT NOT NULL); \
             INSERT INTO t (k, v) VALUES ('a', 'x');",
        )
        .unwrap();
        conn.execute(sql, []).unwrap_err()
    }

    #[test]
    fn unique_violation_is_recognised() {
        let err = constraint_error("INSERT INTO t (k, v) VALUES ('a', 'y')");
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn not_null_violation_is_not_a_duplicate() {
        let err = constraint_error("INSERT INTO t (k, v) VALUES ('b', NULL)");
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn new_store_starts_unconnected() {
        let store = CustomerStore::new(
            StoreConfig::new("never-opened.db")
                .with_console(false)
                .with_log(crate::LogConfig::disabled()),
        );
        assert!(!store.is_connected());
        assert_eq!(store.path(), Path::new("never-opened.db"));
    }
}
