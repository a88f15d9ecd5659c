#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
