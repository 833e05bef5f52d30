//! Conversions from hex-encoded field elements to fixed-width on-chain words.

use alloy::primitives::U256;
use num_bigint::BigUint;

use crate::error::{PrimitivesError, Result};

/// Hex characters per 256-bit on-chain word.
pub const WORD_HEX_CHARS: usize = 64;

fn strip_hex_prefix(hex_str: &str) -> &str {
    hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .unwrap_or(hex_str)
}

fn parse_word(hex_str: &str) -> Result<U256> {
    U256::from_str_radix(hex_str, 16)
        .map_err(|e| PrimitivesError::EncodingError(format!("invalid hex word '{hex_str}': {e}")))
}

/// Split a hex-encoded value into 256-bit words, most-significant word
/// first. The number of words is determined by the (left-zero-padded)
/// length of the hex string, so fixed-width encodings are preserved.
pub fn hex_to_u256_words(hex_str: &str) -> Result<Vec<U256>> {
    let digits = strip_hex_prefix(hex_str);
    if digits.is_empty() {
        return Err(PrimitivesError::EncodingError(
            "empty hex string".to_string(),
        ));
    }
    let padded_len = digits.len().div_ceil(WORD_HEX_CHARS) * WORD_HEX_CHARS;
    let padded = format!("{digits:0>padded_len$}");
    padded
        .as_bytes()
        .chunks(WORD_HEX_CHARS)
        .map(|chunk| {
            let chunk_str = core::str::from_utf8(chunk)
                .map_err(|e| PrimitivesError::EncodingError(e.to_string()))?;
            parse_word(chunk_str)
        })
        .collect()
}

/// Concatenation of [`hex_to_u256_words`] over a list of hex values, in
/// order, with no separators or length prefixes.
pub fn hex_list_to_u256_words(hex_list: &[String]) -> Result<Vec<U256>> {
    let mut words = Vec::new();
    for hex_str in hex_list {
        words.extend(hex_to_u256_words(hex_str)?);
    }
    Ok(words)
}

/// Encode a single field element into exactly `word_count` 256-bit words,
/// most-significant word first. Field elements larger than 256 bits
/// (e.g. BW6-761 base field values) span multiple words.
pub fn field_element_to_words(hex_str: &str, word_count: usize) -> Result<Vec<U256>> {
    let digits = strip_hex_prefix(hex_str);
    let value = BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| {
        PrimitivesError::EncodingError(format!("invalid field element '{hex_str}'"))
    })?;
    let width = word_count * 32;
    let bytes = value.to_bytes_be();
    if bytes.len() > width {
        return Err(PrimitivesError::EncodingError(format!(
            "field element '{hex_str}' does not fit in {word_count} words"
        )));
    }
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(&bytes);
    Ok(padded
        .chunks_exact(32)
        .map(U256::from_be_slice)
        .collect::<Vec<_>>())
}

/// Number of 256-bit words needed to hold an element of the field with the
/// given (hex-encoded) modulus.
pub fn modulus_word_count(modulus_hex: &str) -> Result<usize> {
    let digits = strip_hex_prefix(modulus_hex);
    let modulus = BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| {
        PrimitivesError::EncodingError(format!("invalid field modulus '{modulus_hex}'"))
    })?;
    Ok(core::cmp::max(1, (modulus.bits() as usize).div_ceil(256)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word_value() {
        let words = hex_to_u256_words("0x01").unwrap();
        assert_eq!(words, vec![U256::from(1)]);
    }

    #[test]
    fn width_follows_hex_length() {
        // 65 hex chars pads up to two words.
        let hex = format!("0x1{}", "0".repeat(64));
        let words = hex_to_u256_words(&hex).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], U256::from(1));
        assert_eq!(words[1], U256::ZERO);
    }

    #[test]
    fn multi_word_reassembles_big_word_first() {
        let hex = format!("0x{}{}", "1".repeat(64), "2".repeat(64));
        let words = hex_to_u256_words(&hex).unwrap();
        assert_eq!(words.len(), 2);
        let mut bytes = Vec::new();
        for word in &words {
            bytes.extend_from_slice(&word.to_be_bytes::<32>());
        }
        assert_eq!(format!("0x{}", alloy::hex::encode(bytes)), hex);
    }

    #[test]
    fn list_concatenates_in_order() {
        let list = vec!["0x01".to_string(), "0x02".to_string()];
        let words = hex_list_to_u256_words(&list).unwrap();
        assert_eq!(words, vec![U256::from(1), U256::from(2)]);
    }

    #[test]
    fn field_element_fixed_width() {
        let words = field_element_to_words("0x05", 3).unwrap();
        assert_eq!(words, vec![U256::ZERO, U256::ZERO, U256::from(5)]);
    }

    #[test]
    fn field_element_too_wide_rejected() {
        let hex = format!("0x1{}", "0".repeat(64));
        assert!(field_element_to_words(&hex, 1).is_err());
    }

    #[test]
    fn word_counts_from_modulus() {
        // Up to 256 bits fits one word, a 377-bit modulus needs two.
        assert_eq!(modulus_word_count(&format!("0x{}", "f".repeat(64))).unwrap(), 1);
        assert_eq!(modulus_word_count(&format!("0x1{}", "0".repeat(94))).unwrap(), 2);
    }

    #[test]
    fn rejects_garbage() {
        assert!(hex_to_u256_words("0xzz").is_err());
        assert!(hex_to_u256_words("").is_err());
    }
}
