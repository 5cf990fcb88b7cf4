use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ShardwiseError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("failed for item at index {index}: {source}")]
    BatchItem {
        index: usize,
        source: Box<ShardwiseError>,
    },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Search cancelled")]
    Cancelled,

    #[error("Search deadline exceeded")]
    DeadlineExceeded,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Tantivy error: {0}")]
    Tantivy(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ShardwiseError>;

impl ShardwiseError {
    /// Wrap an error with the position of the batch item that caused it.
    pub fn at_index(index: usize, source: ShardwiseError) -> Self {
        ShardwiseError::BatchItem {
            index,
            source: Box::new(source),
        }
    }

    /// Unwraps `BatchItem` layers down to the originating error.
    pub fn root(&self) -> &ShardwiseError {
        match self {
            ShardwiseError::BatchItem { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), ShardwiseError::NotFound(_))
    }
}

impl From<std::io::Error> for ShardwiseError {
    fn from(e: std::io::Error) -> Self {
        ShardwiseError::Io(e.to_string())
    }
}

impl From<tantivy::TantivyError> for ShardwiseError {
    fn from(e: tantivy::TantivyError) -> Self {
        ShardwiseError::Tantivy(e.to_string())
    }
}

impl From<tantivy::directory::error::OpenDirectoryError> for ShardwiseError {
    fn from(e: tantivy::directory::error::OpenDirectoryError) -> Self {
        ShardwiseError::Tantivy(e.to_string())
    }
}

impl From<serde_json::Error> for ShardwiseError {
    fn from(e: serde_json::Error) -> Self {
        ShardwiseError::Json(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ShardwiseError {
    fn from(e: tokio::task::JoinError) -> Self {
        ShardwiseError::Internal(format!("shard task failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_item_message_names_index() {
        let err = ShardwiseError::at_index(3, ShardwiseError::MissingField("sku".to_string()));
        assert_eq!(
            err.to_string(),
            "failed for item at index 3: Missing required field: sku"
        );
        assert!(matches!(err.root(), ShardwiseError::MissingField(_)));
    }

    #[test]
    fn not_found_seen_through_batch_item() {
        let err = ShardwiseError::at_index(0, ShardwiseError::NotFound("a".to_string()));
        assert!(err.is_not_found());
        assert!(!ShardwiseError::Cancelled.is_not_found());
    }
}
