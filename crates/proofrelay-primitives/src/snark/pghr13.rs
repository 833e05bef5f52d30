//! PGHR13 verification key and proof value objects.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pairing::PairingParameters;
use crate::points::{G1Point, G2Point};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pghr13VerificationKey {
    pub a: G2Point,
    pub b: G1Point,
    pub c: G2Point,
    pub g: G2Point,
    pub gb1: G1Point,
    pub gb2: G2Point,
    pub z: G2Point,
    pub abc: Vec<G1Point>,
}

impl Pghr13VerificationKey {
    pub fn to_contract_parameters(&self, pairing: &PairingParameters) -> Result<Vec<U256>> {
        let base_words = pairing.base_word_count()?;
        let mut words = self.a.to_words(base_words)?;
        words.extend(self.b.to_words(base_words)?);
        words.extend(self.c.to_words(base_words)?);
        words.extend(self.g.to_words(base_words)?);
        words.extend(self.gb1.to_words(base_words)?);
        words.extend(self.gb2.to_words(base_words)?);
        words.extend(self.z.to_words(base_words)?);
        for point in &self.abc {
            words.extend(point.to_words(base_words)?);
        }
        Ok(words)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pghr13Proof {
    pub a: G1Point,
    pub a_p: G1Point,
    pub b: G2Point,
    pub b_p: G1Point,
    pub c: G1Point,
    pub c_p: G1Point,
    pub h: G1Point,
    pub k: G1Point,
}

impl Pghr13Proof {
    pub fn to_contract_parameters(&self, pairing: &PairingParameters) -> Result<Vec<U256>> {
        let base_words = pairing.base_word_count()?;
        let mut words = self.a.to_words(base_words)?;
        words.extend(self.a_p.to_words(base_words)?);
        words.extend(self.b.to_words(base_words)?);
        words.extend(self.b_p.to_words(base_words)?);
        words.extend(self.c.to_words(base_words)?);
        words.extend(self.c_p.to_words(base_words)?);
        words.extend(self.h.to_words(base_words)?);
        words.extend(self.k.to_words(base_words)?);
        Ok(words)
    }
}
