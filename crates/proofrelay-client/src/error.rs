use proofrelay_primitives::PrimitivesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Failed to parse server url: {0}")]
    ServerUrlParsingError(String),
    #[error("Failed rpc request: {0}")]
    CommunicationError(String),
    #[error("No aggregated transaction available yet: {0}")]
    BatchNotReady(String),
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),
    #[error("Failed to send transaction: {0}")]
    TransactionError(String),
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),
    #[error("Timed out waiting for transaction confirmation: {0}")]
    ConfirmationTimeout(String),
    #[error("Dispatcher instance error: {0}")]
    InstanceError(String),
    #[error("Primitives error: {0}")]
    PrimitivesError(#[from] PrimitivesError),
}

impl ClientError {
    /// True for outcomes a caller may poll on (the aggregator has simply
    /// not produced a batch yet), as opposed to definite failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BatchNotReady(_))
    }
}

pub type Result<T> = core::result::Result<T, ClientError>;
