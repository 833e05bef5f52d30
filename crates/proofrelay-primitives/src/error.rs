use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrimitivesError {
    #[error("Encoding error: {0}")]
    EncodingError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Snark consistency error: {0}")]
    ConsistencyError(String),
    #[error("Invalid snark scheme: {0}")]
    InvalidScheme(String),
}

pub type Result<T> = core::result::Result<T, PrimitivesError>;
