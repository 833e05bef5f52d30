//! Groth16 verification key and proof value objects.
//!
//! The JSON field layout is the wire schema shared with the aggregation
//! server; `ABC` keeps its historical upper-case key.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pairing::PairingParameters;
use crate::points::{G1Point, G2Point};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16VerificationKey {
    pub alpha: G1Point,
    pub beta: G2Point,
    pub delta: G2Point,
    #[serde(rename = "ABC")]
    pub abc: Vec<G1Point>,
}

impl Groth16VerificationKey {
    /// Flatten into on-chain words: alpha, beta, delta, then the ABC
    /// points in order. Coordinate width follows the pairing's base field.
    pub fn to_contract_parameters(&self, pairing: &PairingParameters) -> Result<Vec<U256>> {
        let base_words = pairing.base_word_count()?;
        let mut words = self.alpha.to_words(base_words)?;
        words.extend(self.beta.to_words(base_words)?);
        words.extend(self.delta.to_words(base_words)?);
        for point in &self.abc {
            words.extend(point.to_words(base_words)?);
        }
        Ok(words)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

impl Groth16Proof {
    pub fn to_contract_parameters(&self, pairing: &PairingParameters) -> Result<Vec<U256>> {
        let base_words = pairing.base_word_count()?;
        let mut words = self.a.to_words(base_words)?;
        words.extend(self.b.to_words(base_words)?);
        words.extend(self.c.to_words(base_words)?);
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::Fq;
    use serde_json::json;

    fn sample_pairing() -> PairingParameters {
        PairingParameters {
            name: "test-curve".to_string(),
            r: format!("0x{}", "f".repeat(64)),
            q: format!("0x{}", "f".repeat(64)),
            generator_g1: G1Point("0x01".to_string(), "0x02".to_string()),
            generator_g2: G2Point(Fq::Base("0x01".to_string()), Fq::Base("0x02".to_string())),
        }
    }

    fn sample_vk() -> Groth16VerificationKey {
        Groth16VerificationKey {
            alpha: G1Point("0x01".to_string(), "0x02".to_string()),
            beta: G2Point(Fq::Base("0x03".to_string()), Fq::Base("0x04".to_string())),
            delta: G2Point(Fq::Base("0x05".to_string()), Fq::Base("0x06".to_string())),
            abc: vec![
                G1Point("0x07".to_string(), "0x08".to_string()),
                G1Point("0x09".to_string(), "0x0a".to_string()),
            ],
        }
    }

    #[test]
    fn json_round_trip_preserves_abc_key() {
        let vk = sample_vk();
        let json = serde_json::to_value(&vk).unwrap();
        assert!(json.get("ABC").is_some());
        let back: Groth16VerificationKey = serde_json::from_value(json).unwrap();
        assert_eq!(back, vk);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = json!({
            "alpha": ["0x01", "0x02"],
            "beta": ["0x03", "0x04"],
            "delta": ["0x05", "0x06"],
            "ABC": [["0x07", "0x08"]],
            "future_field": 42,
        });
        assert!(serde_json::from_value::<Groth16VerificationKey>(json).is_ok());
    }

    #[test]
    fn contract_parameters_follow_declaration_order() {
        let words = sample_vk().to_contract_parameters(&sample_pairing()).unwrap();
        let expected: Vec<U256> = (1..=10).map(U256::from).collect();
        assert_eq!(words, expected);
    }
}
