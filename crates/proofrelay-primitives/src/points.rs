//! Curve point value objects as they appear on the wire: coordinates are
//! hex-encoded field elements, extension-field coordinates are arrays of
//! base-field components.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::encoding::field_element_to_words;
use crate::error::Result;

/// A base-field element or an extension-field element (component-wise,
/// lowest-degree component first).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fq {
    Base(String),
    Ext(Vec<String>),
}

impl Fq {
    /// Flatten into fixed-width words, each component `base_words` wide.
    pub fn to_words(&self, base_words: usize) -> Result<Vec<U256>> {
        match self {
            Fq::Base(hex_str) => field_element_to_words(hex_str, base_words),
            Fq::Ext(components) => {
                let mut words = Vec::new();
                for component in components {
                    words.extend(field_element_to_words(component, base_words)?);
                }
                Ok(words)
            }
        }
    }
}

/// An affine G1 point, serialized as `[x, y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct G1Point(pub String, pub String);

impl G1Point {
    pub fn to_words(&self, base_words: usize) -> Result<Vec<U256>> {
        let mut words = field_element_to_words(&self.0, base_words)?;
        words.extend(field_element_to_words(&self.1, base_words)?);
        Ok(words)
    }
}

/// An affine G2 point, serialized as `[x, y]` where each coordinate may be
/// an extension-field element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct G2Point(pub Fq, pub Fq);

impl G2Point {
    pub fn to_words(&self, base_words: usize) -> Result<Vec<U256>> {
        let mut words = self.0.to_words(base_words)?;
        words.extend(self.1.to_words(base_words)?);
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn g1_json_shape() {
        let point = G1Point("0x01".to_string(), "0x02".to_string());
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json, serde_json::json!(["0x01", "0x02"]));
        let back: G1Point = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn g2_extension_coordinates_round_trip() {
        let point = G2Point(
            Fq::Ext(vec!["0x01".to_string(), "0x02".to_string()]),
            Fq::Ext(vec!["0x03".to_string(), "0x04".to_string()]),
        );
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(
            json,
            serde_json::json!([["0x01", "0x02"], ["0x03", "0x04"]])
        );
        let back: G2Point = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn g2_base_coordinates_flatten_in_order() {
        let point = G2Point(Fq::Base("0x01".to_string()), Fq::Base("0x02".to_string()));
        let words = point.to_words(1).unwrap();
        assert_eq!(words, vec![U256::from(1), U256::from(2)]);
    }
}
