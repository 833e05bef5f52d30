//! Core types for the proofrelay aggregation protocol: snark scheme
//! handles, wire value objects, pairing parameters and the on-chain word
//! codec shared by the client and dispatcher layers.

pub mod config;
pub mod encoding;
pub mod error;
pub mod pairing;
pub mod points;
pub mod snark;
pub mod transaction;

pub use config::AggregatorConfiguration;
pub use error::{PrimitivesError, Result};
pub use pairing::PairingParameters;
pub use snark::{
    NestedSnark, NestedTier, Proof, ProofTier, SnarkHandle, SnarkId, VerificationKey, WrapperSnark,
    WrapperTier,
};
pub use transaction::{AggregatedTransaction, ExtendedProof, NestedTransaction};
