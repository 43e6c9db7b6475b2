use std::path::PathBuf;

/// Errors surfaced by [`CustomerStore`](crate::CustomerStore) operations.
///
/// Not-found and duplicate-key conditions are normal outcomes and are carried
/// by [`InsertOutcome`](crate::InsertOutcome), [`DeleteOutcome`](crate::DeleteOutcome)
/// and the boolean finds instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An operation needed an open connection and there was none.
    #[error("no open database connection")]
    NotConnected,

    /// The engine could not open the database file.
    #[error("cannot open database at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// True when the failure only means `connect` has not been called yet.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, StoreError::NotConnected)
    }
}
