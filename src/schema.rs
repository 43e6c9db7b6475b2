//! Table definitions rendered to SQLite DDL.

use std::fmt;

pub const CUSTOMERS_TABLE: &str = "customers";

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Integer,
    Text,
    /// Declared length only; SQLite stores it as TEXT and does not enforce it.
    Varchar(u16),
    Real,
    Blob,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => f.write_str("INTEGER"),
            DataType::Text => f.write_str("TEXT"),
            DataType::Varchar(len) => write!(f, "VARCHAR({len})"),
            DataType::Real => f.write_str("REAL"),
            DataType::Blob => f.write_str("BLOB"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    Autoincrement,
    NotNull,
    Unique,
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::Autoincrement => "AUTOINCREMENT",
            ColumnConstraint::NotNull => "NOT NULL",
            ColumnConstraint::Unique => "UNIQUE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    /// Rendered in the order given
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type);
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(&constraint.to_string());
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// `CREATE TABLE IF NOT EXISTS`, so running it on every startup is safe.
    pub fn create_if_not_exists_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(ColumnDefinition::to_sql)
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({});", self.name, columns)
    }
}

/// The `customers` table. `cpf` is the unique business key; `id` is assigned
/// by the engine.
pub fn customers_table() -> TableDefinition {
    use ColumnConstraint::*;

    TableDefinition::new(CUSTOMERS_TABLE)
        .add_column(
            ColumnDefinition::new("id", DataType::Integer)
                .with_constraint(NotNull)
                .with_constraint(PrimaryKey)
                .with_constraint(Autoincrement),
        )
        .add_column(ColumnDefinition::new("name", DataType::Text).with_constraint(NotNull))
        .add_column(
            ColumnDefinition::new("password", DataType::Varchar(20)).with_constraint(NotNull),
        )
        .add_column(
            ColumnDefinition::new("cpf", DataType::Varchar(11))
                .with_constraint(Unique)
                .with_constraint(NotNull),
        )
        .add_column(ColumnDefinition::new("email", DataType::Text).with_constraint(NotNull))
}
