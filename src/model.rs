use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A persisted row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Stored as given, in plain text.
    pub password: String,
    pub cpf: String,
    pub email: String,
}

impl Customer {
    /// Expects columns in `id, name, password, cpf, email` order.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            password: row.get(2)?,
            cpf: row.get(3)?,
            email: row.get(4)?,
        })
    }
}

/// Outcome of [`CustomerStore::insert_customer`](crate::CustomerStore::insert_customer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row committed under the engine-assigned id.
    Inserted(i64),
    /// A customer with this CPF already exists; nothing was written.
    Duplicate,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Outcome of [`CustomerStore::delete_by_cpf`](crate::CustomerStore::delete_by_cpf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Number of rows removed, always at least one.
    Deleted(usize),
    NotRegistered,
}

impl DeleteOutcome {
    pub(crate) fn from_affected(rows: usize) -> Self {
        if rows > 0 {
            DeleteOutcome::Deleted(rows)
        } else {
            DeleteOutcome::NotRegistered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_outcome_from_affected_rows() {
        assert_eq!(DeleteOutcome::from_affected(0), DeleteOutcome::NotRegistered);
        assert_eq!(DeleteOutcome::from_affected(1), DeleteOutcome::Deleted(1));
    }

    #[test]
    fn customer_serializes_with_field_names() {
        let customer = Customer {
            id: 7,
            name: "John".to_string(),
            password: "python".to_string(),
            cpf: "11111111111".to_string(),
            email: "john@gmail.com".to_string(),
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["cpf"], "11111111111");

        let back: Customer = serde_json::from_value(json).unwrap();
        assert_eq!(back, customer);
    }
}
