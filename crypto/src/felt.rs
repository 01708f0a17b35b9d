//! Hex and byte codecs for field elements.
//!
//! The persisted key formats all use the same canonical encoding: lower-case
//! hex with leading zeros stripped, where zero renders as a single `0` digit.
//! Parsing is the permissive inverse: any length of hex, with or without a
//! `0x` prefix, and the empty string reads as zero.

use starknet_types_core::felt::Felt;
use thiserror::Error;

/// Byte length of the fixed big-endian felt encoding.
pub const FELT_LENGTH: usize = 32;

/// Errors raised when decoding caller-supplied field elements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeltError {
    /// Input is not valid hex or does not fit in a field element
    #[error("invalid felt hex: {0:?}")]
    InvalidHex(String),

    /// Byte input longer than the 32-byte felt encoding
    #[error("felt byte input too long: {0} bytes")]
    Oversized(usize),
}

/// Parses a field element from hex, with or without a `0x` prefix.
///
/// Accepts arbitrary-length hex up to 64 digits; the empty string (and bare
/// `"0x"`) parses as zero.
pub fn from_hex(input: &str) -> Result<Felt, FeltError> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(Felt::ZERO);
    }
    Felt::from_hex(digits).map_err(|_| FeltError::InvalidHex(input.to_string()))
}

/// Formats a field element as `0x`-prefixed canonical lower-case hex.
///
/// Leading zeros are stripped; zero renders as `"0x0"`.
pub fn to_hex(value: &Felt) -> String {
    format!("0x{}", hex_digits(value))
}

/// Formats a field element as canonical lower-case hex without a prefix.
///
/// This is the form stored under the `state_root` key and used in the
/// `contract_hash:` key suffix.
pub fn to_hex_unprefixed(value: &Felt) -> String {
    hex_digits(value)
}

fn hex_digits(value: &Felt) -> String {
    let encoded = hex::encode(value.to_bytes_be());
    let digits = encoded.trim_start_matches('0');
    if digits.is_empty() {
        "0".to_string()
    } else {
        digits.to_string()
    }
}

/// Decodes a field element from up to 32 big-endian bytes.
///
/// Shorter inputs are zero-extended on the high side, so the minimal
/// big-endian encoding (no leading zero bytes, zero as the empty slice)
/// round-trips with [`to_be_bytes_minimal`].
pub fn from_be_slice(bytes: &[u8]) -> Result<Felt, FeltError> {
    if bytes.len() > FELT_LENGTH {
        return Err(FeltError::Oversized(bytes.len()));
    }
    let mut buf = [0u8; FELT_LENGTH];
    buf[FELT_LENGTH - bytes.len()..].copy_from_slice(bytes);
    Ok(Felt::from_bytes_be(&buf))
}

/// Encodes a field element as minimal big-endian bytes.
///
/// Zero encodes as the empty vector.
pub fn to_be_bytes_minimal(value: &Felt) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(FELT_LENGTH);
    bytes[first..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for input in ["0x0", "0x1", "0xcafe", "0x7fffffffffffffff"] {
            let value = from_hex(input).unwrap();
            assert_eq!(to_hex(&value), input);
        }
    }

    #[test]
    fn test_from_hex_permissive() {
        assert_eq!(from_hex("").unwrap(), Felt::ZERO);
        assert_eq!(from_hex("0x").unwrap(), Felt::ZERO);
        assert_eq!(from_hex("cafe").unwrap(), from_hex("0xcafe").unwrap());
        assert_eq!(from_hex("0x00001").unwrap(), Felt::ONE);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(from_hex("0xzz").is_err());
        assert!(from_hex("not hex").is_err());
    }

    #[test]
    fn test_zero_renders_as_single_digit() {
        assert_eq!(to_hex(&Felt::ZERO), "0x0");
        assert_eq!(to_hex_unprefixed(&Felt::ZERO), "0");
    }

    #[test]
    fn test_unprefixed_strips_leading_zeros() {
        let value = from_hex("0x0000beef").unwrap();
        assert_eq!(to_hex_unprefixed(&value), "beef");
    }

    #[test]
    fn test_minimal_bytes_round_trip() {
        for input in ["0x0", "0x1", "0xff00", "0xdeadbeefcafe"] {
            let value = from_hex(input).unwrap();
            let bytes = to_be_bytes_minimal(&value);
            assert_eq!(from_be_slice(&bytes).unwrap(), value);
        }
        assert!(to_be_bytes_minimal(&Felt::ZERO).is_empty());
    }

    #[test]
    fn test_from_be_slice_rejects_oversized() {
        assert!(matches!(
            from_be_slice(&[0u8; 33]),
            Err(FeltError::Oversized(33))
        ));
    }
}
