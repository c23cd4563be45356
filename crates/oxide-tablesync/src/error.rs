//! Error types for table reconciliation.

/// Errors that can occur while reconciling a table.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The desired spec is malformed or incomplete. Nothing was sent.
    #[error("Invalid table definition: {0}")]
    Validation(String),

    /// The executor rejected or failed to run a statement.
    #[error("Error running statement `{statement}`: {source}")]
    Execution {
        /// The statement that was sent.
        statement: String,
        /// The executor's own error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A name-based lookup found no table.
    #[error("Table '{database}.{name}' not found")]
    NotFound {
        /// Database that was searched.
        database: String,
        /// Table name that was searched.
        name: String,
    },

    /// A row that was just written could not be read back.
    #[error("Catalog out of sync: {0}")]
    Sync(String),

    /// A drop was attempted while `allow_destructive` is false.
    #[error(
        "Refusing to drop {object}: 'allow_destructive' is false. \
         Set 'allow_destructive = true' to allow dropping columns or tables"
    )]
    DestructiveChangeDenied {
        /// The exact columns or table that would have been dropped.
        object: String,
    },

    /// A catalog row is missing a field or carries a value that cannot be parsed.
    #[error("Malformed catalog row: {field}")]
    MalformedRow {
        /// Description of the offending field.
        field: String,
    },

    /// IO error (reading spec or state documents).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReconcileError {
    pub(crate) fn execution<E>(statement: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Execution {
            statement: statement.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;
