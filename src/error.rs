use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown readiness flag: {0}")]
    UnknownFlag(String),

    #[error("rendering surface failure: {0}")]
    Surface(String),

    #[error("controller already destroyed")]
    Destroyed,
}
