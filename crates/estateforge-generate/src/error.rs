use thiserror::Error;

/// Errors emitted by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("description template references unknown placeholder '{0}'")]
    UnknownPlaceholder(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
