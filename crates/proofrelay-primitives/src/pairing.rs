use serde::{Deserialize, Serialize};

use crate::encoding::modulus_word_count;
use crate::error::Result;
use crate::points::{G1Point, G2Point};

/// The curve and field constants needed to interpret keys and proofs for a
/// specific elliptic-curve pairing. `r` is the scalar field modulus, `q`
/// the base field modulus, both hex-encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingParameters {
    pub name: String,
    pub r: String,
    pub q: String,
    pub generator_g1: G1Point,
    pub generator_g2: G2Point,
}

impl PairingParameters {
    /// Words per scalar field element in the on-chain encoding.
    pub fn scalar_word_count(&self) -> Result<usize> {
        modulus_word_count(&self.r)
    }

    /// Words per base field element (curve point coordinate) in the
    /// on-chain encoding.
    pub fn base_word_count(&self) -> Result<usize> {
        modulus_word_count(&self.q)
    }
}
