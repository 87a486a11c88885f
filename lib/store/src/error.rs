use std::error::Error;

/// An error related to source operations (reads, writes, push-down queries).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A statement or template is malformed for the attempted operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The source lacks the capability for the attempted operation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    /// A backing-store failure, propagated unchanged to the caller.
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StoreError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn other(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }
}
