//! Table construction errors.

/// Errors raised when a table is configured against the wrong row type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A column, search, filter or facet key is not a field of the row type.
    #[error("'{key}' is not a field of {row_type}")]
    UnknownField { key: String, row_type: &'static str },

    /// Two columns share a key.
    #[error("duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// A table needs at least one column.
    #[error("table has no columns")]
    NoColumns,
}

impl TableError {
    pub(crate) fn unknown_field<R>(key: impl Into<String>) -> Self {
        Self::UnknownField {
            key: key.into(),
            row_type: short_type_name::<R>(),
        }
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
