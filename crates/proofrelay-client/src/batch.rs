//! State-free verification of the per-nested-proof outcomes encoded in a
//! batch's public inputs.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// How the wrapper circuit encodes nested-proof validity in its public
/// inputs. The wire format is ambiguous between the two, so the encoding
/// in force is explicit client configuration, never inferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultEncoding {
    /// Legacy layout: one result word per nested proof, at the end of each
    /// of `batch_size` equal input segments.
    PerSlot,
    /// Current layout: input word 1 is a bitmask with bit `i` set when
    /// nested proof `i` (submission order) was judged valid.
    PackedBitfield,
}

fn parse_input_word(hex_str: &str) -> Result<U256> {
    let digits = hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .unwrap_or(hex_str);
    U256::from_str_radix(digits, 16)
        .map_err(|e| ClientError::InvalidBatch(format!("unparsable input word '{hex_str}': {e}")))
}

/// Decide whether every nested proof folded into the batch was judged
/// valid by the wrapper circuit. Pure function of the inputs and the
/// expected batch size.
pub fn check_batch_results(
    encoding: ResultEncoding,
    inputs: &[String],
    batch_size: usize,
) -> Result<()> {
    if batch_size == 0 {
        return Err(ClientError::InvalidBatch(
            "batch size must be positive".to_string(),
        ));
    }
    match encoding {
        ResultEncoding::PerSlot => check_per_slot(inputs, batch_size),
        ResultEncoding::PackedBitfield => check_packed_bitfield(inputs, batch_size),
    }
}

fn check_per_slot(inputs: &[String], batch_size: usize) -> Result<()> {
    // Leading `len % batch_size` words are reserved (e.g. a verification
    // key hash); the rest splits into equal per-proof segments whose last
    // word is the result.
    let reserved = inputs.len() % batch_size;
    let per_slot = (inputs.len() - reserved) / batch_size;
    if per_slot == 0 {
        return Err(ClientError::InvalidBatch(format!(
            "{} inputs cannot hold results for {batch_size} nested proofs",
            inputs.len()
        )));
    }
    for slot in 0..batch_size {
        let result_index = reserved + per_slot * (slot + 1) - 1;
        let result = parse_input_word(&inputs[result_index])?;
        if result != U256::from(1) {
            return Err(ClientError::InvalidBatch(format!(
                "nested proof {slot} judged invalid (result {result})"
            )));
        }
    }
    Ok(())
}

fn check_packed_bitfield(inputs: &[String], batch_size: usize) -> Result<()> {
    if batch_size > 255 {
        return Err(ClientError::InvalidBatch(format!(
            "batch size {batch_size} exceeds the validity bitfield width"
        )));
    }
    let word = inputs.get(1).ok_or_else(|| {
        ClientError::InvalidBatch("inputs carry no validity bitfield word".to_string())
    })?;
    let mask = parse_input_word(word)?;
    let expected = (U256::from(1) << batch_size) - U256::from(1);
    if mask != expected {
        return Err(ClientError::InvalidBatch(format!(
            "at least one nested proof judged invalid (bitfield {mask:#x}, expected {expected:#x})"
        )));
    }
    Ok(())
}
