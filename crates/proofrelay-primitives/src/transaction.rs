//! Transaction value objects crossing the wire: a nested transaction
//! submitted by an application, and the aggregated transaction ("batch")
//! produced by the aggregation server.

use alloy::primitives::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::{PrimitivesError, Result};
use crate::snark::{NestedSnark, NestedTier, Proof, ProofTier, SnarkHandle, WrapperSnark, WrapperTier};

fn missing(field: &str) -> PrimitivesError {
    PrimitivesError::SerializationError(format!("missing field '{field}'"))
}

/// A proof together with its ordered public inputs (hex-encoded field
/// elements). Input ordering is significant and proving-system-specific.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound = "")]
pub struct ExtendedProof<T: ProofTier> {
    pub proof: Proof<T>,
    pub inputs: Vec<String>,
}

impl<T: ProofTier> ExtendedProof<T> {
    pub fn from_json(snark: &SnarkHandle<T>, value: &Value) -> Result<Self> {
        let proof = snark.proof_from_json(value.get("proof").ok_or_else(|| missing("proof"))?)?;
        let inputs = serde_json::from_value(
            value.get("inputs").ok_or_else(|| missing("inputs"))?.clone(),
        )
        .map_err(|e| PrimitivesError::SerializationError(format!("invalid inputs: {e}")))?;
        Ok(Self { proof, inputs })
    }

    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| PrimitivesError::SerializationError(e.to_string()))
    }
}

impl<T: ProofTier> SnarkHandle<T> {
    pub fn extended_proof_from_json(&self, value: &Value) -> Result<ExtendedProof<T>> {
        ExtendedProof::from_json(self, value)
    }

    pub fn extended_proof_to_json(&self, ext_proof: &ExtendedProof<T>) -> Result<Value> {
        self.ensure_scheme(ext_proof.proof.scheme(), "extended proof")?;
        ext_proof.to_json()
    }
}

/// A transaction submitted by an application for aggregation: the nested
/// proof, an opaque parameter blob forwarded verbatim to the application
/// contract, and the offered fee in the smallest on-chain unit.
/// Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NestedTransaction {
    pub application_name: String,
    #[serde(rename = "extended_proof")]
    pub ext_proof: ExtendedProof<NestedTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Bytes>,
    pub fee: u64,
}

impl NestedTransaction {
    pub fn from_json(snark: &NestedSnark, value: &Value) -> Result<Self> {
        let application_name = value
            .get("application_name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("application_name"))?
            .to_string();
        if application_name.is_empty() {
            return Err(PrimitivesError::SerializationError(
                "application_name must not be empty".to_string(),
            ));
        }
        let ext_proof = ExtendedProof::from_json(
            snark,
            value
                .get("extended_proof")
                .ok_or_else(|| missing("extended_proof"))?,
        )?;
        let parameters = match value.get("parameters") {
            None | Some(Value::Null) => None,
            Some(v) => Some(serde_json::from_value::<Bytes>(v.clone()).map_err(|e| {
                PrimitivesError::SerializationError(format!("invalid parameters: {e}"))
            })?),
        };
        let fee = match value.get("fee") {
            None => 0,
            Some(v) => v.as_u64().ok_or_else(|| {
                PrimitivesError::SerializationError("fee must be a non-negative integer".to_string())
            })?,
        };
        Ok(Self {
            application_name,
            ext_proof,
            parameters,
            fee,
        })
    }

    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| PrimitivesError::SerializationError(e.to_string()))
    }
}

/// The aggregation server's output for one batch: a wrapper proof over all
/// folded nested proofs plus the per-nested-transaction parameter blobs,
/// in submission order.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedTransaction {
    pub application_name: String,
    pub ext_proof: ExtendedProof<WrapperTier>,
    pub nested_parameters: Vec<Vec<String>>,
}

impl AggregatedTransaction {
    pub fn from_json(snark: &WrapperSnark, value: &Value) -> Result<Self> {
        let application_name = value
            .get("application_name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("application_name"))?
            .to_string();
        let ext_proof = ExtendedProof::from_json(snark, value)?;
        let nested_parameters = match value.get("nested_parameters") {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
                PrimitivesError::SerializationError(format!("invalid nested_parameters: {e}"))
            })?,
        };
        Ok(Self {
            application_name,
            ext_proof,
            nested_parameters,
        })
    }

    /// Wire layout keeps `proof` and `inputs` at the top level;
    /// `nested_parameters` is omitted when empty.
    pub fn to_json(&self) -> Result<Value> {
        let mut object = serde_json::Map::new();
        object.insert(
            "application_name".to_string(),
            Value::String(self.application_name.clone()),
        );
        let ext_proof = self.ext_proof.to_json()?;
        if let Value::Object(fields) = ext_proof {
            object.extend(fields);
        }
        if !self.nested_parameters.is_empty() {
            object.insert(
                "nested_parameters".to_string(),
                serde_json::to_value(&self.nested_parameters)
                    .map_err(|e| PrimitivesError::SerializationError(e.to_string()))?,
            );
        }
        Ok(Value::Object(object))
    }

    /// Fail fast when the parameter blob count disagrees with the number
    /// of nested proofs the caller expects in this batch. An empty
    /// `nested_parameters` is exempt for any `batch_size`: the wire form
    /// omits the field entirely when no application parameters exist, so
    /// emptiness carries no count information.
    pub fn ensure_batch_size(&self, batch_size: usize) -> Result<()> {
        if !self.nested_parameters.is_empty() && self.nested_parameters.len() != batch_size {
            return Err(PrimitivesError::ConsistencyError(format!(
                "batch carries {} nested parameter blobs but {batch_size} were expected",
                self.nested_parameters.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snark::SnarkId;
    use serde_json::json;

    fn groth16_proof_json() -> Value {
        json!({
            "a": ["0x01", "0x02"],
            "b": [["0x03", "0x04"], ["0x05", "0x06"]],
            "c": ["0x07", "0x08"],
        })
    }

    fn nested_snark() -> NestedSnark {
        NestedSnark::new(SnarkId::Groth16)
    }

    fn wrapper_snark() -> WrapperSnark {
        WrapperSnark::new(SnarkId::Groth16)
    }

    #[test]
    fn nested_transaction_round_trip() {
        let tx_json = json!({
            "application_name": "dummy-app",
            "extended_proof": {
                "proof": groth16_proof_json(),
                "inputs": ["0x01", "0x02"],
            },
            "parameters": "0xdeadbeef",
            "fee": 7,
        });
        let tx = NestedTransaction::from_json(&nested_snark(), &tx_json).unwrap();
        assert_eq!(tx.application_name, "dummy-app");
        assert_eq!(tx.fee, 7);
        assert_eq!(tx.to_json().unwrap(), tx_json);
    }

    #[test]
    fn nested_transaction_optional_fields_are_omitted() {
        let tx_json = json!({
            "application_name": "dummy-app",
            "extended_proof": {
                "proof": groth16_proof_json(),
                "inputs": ["0x01"],
            },
        });
        let tx = NestedTransaction::from_json(&nested_snark(), &tx_json).unwrap();
        assert_eq!(tx.parameters, None);
        assert_eq!(tx.fee, 0);
        let out = tx.to_json().unwrap();
        assert!(out.get("parameters").is_none());
    }

    #[test]
    fn nested_transaction_rejects_empty_name() {
        let tx_json = json!({
            "application_name": "",
            "extended_proof": {
                "proof": groth16_proof_json(),
                "inputs": [],
            },
        });
        assert!(NestedTransaction::from_json(&nested_snark(), &tx_json).is_err());
    }

    #[test]
    fn aggregated_transaction_round_trip() {
        let batch_json = json!({
            "application_name": "dummy-app",
            "proof": groth16_proof_json(),
            "inputs": ["0x01", "0x0f"],
            "nested_parameters": [["0x01", "0x02"], ["0x03"]],
        });
        let batch = AggregatedTransaction::from_json(&wrapper_snark(), &batch_json).unwrap();
        assert_eq!(batch.nested_parameters.len(), 2);
        assert_eq!(batch.to_json().unwrap(), batch_json);
    }

    #[test]
    fn aggregated_transaction_ignores_unknown_fields() {
        let batch_json = json!({
            "application_name": "dummy-app",
            "proof": groth16_proof_json(),
            "inputs": [],
            "future_field": {"x": 1},
        });
        let batch = AggregatedTransaction::from_json(&wrapper_snark(), &batch_json).unwrap();
        assert!(batch.nested_parameters.is_empty());
        // Empty nested_parameters serialize as omitted, not null.
        assert!(batch.to_json().unwrap().get("nested_parameters").is_none());
    }

    #[test]
    fn batch_size_mismatch_is_a_consistency_error() {
        let batch_json = json!({
            "application_name": "dummy-app",
            "proof": groth16_proof_json(),
            "inputs": [],
            "nested_parameters": [["0x01"], ["0x02"], ["0x03"]],
        });
        let batch = AggregatedTransaction::from_json(&wrapper_snark(), &batch_json).unwrap();
        assert!(batch.ensure_batch_size(3).is_ok());
        let err = batch.ensure_batch_size(2).unwrap_err();
        assert!(matches!(err, PrimitivesError::ConsistencyError(_)));

        // An omitted (empty) blob list is consistent with any size.
        let bare_json = json!({
            "application_name": "dummy-app",
            "proof": groth16_proof_json(),
            "inputs": [],
        });
        let bare = AggregatedTransaction::from_json(&wrapper_snark(), &bare_json).unwrap();
        assert!(bare.ensure_batch_size(2).is_ok());
        assert!(bare.ensure_batch_size(8).is_ok());
    }
}
