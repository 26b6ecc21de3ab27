//! Fixed-width hex and byte helpers.
//!
//! All word helpers operate on hex bodies without the `0x` prefix. A word is
//! 32 bytes, i.e. [`WORD_HEX_LEN`] hex digits.

use alloy_primitives::U256;
use alloy_primitives::hex;

use crate::error::CodecError;

/// Number of bytes in an ABI word.
pub const WORD_BYTES: usize = 32;

/// Number of hex digits in an ABI word.
pub const WORD_HEX_LEN: usize = WORD_BYTES * 2;

/// Returns `hex` without a leading `0x`, if present.
#[must_use]
pub fn strip_0x(hex: &str) -> &str {
    hex.strip_prefix("0x").unwrap_or(hex)
}

/// Left-pads a hex body with zeros to a full word.
///
/// Bodies that are already a word or longer are returned unchanged.
#[must_use]
pub fn pad_word(hex_body: &str) -> String {
    format!("{hex_body:0>width$}", width = WORD_HEX_LEN)
}

/// Encodes an unsigned integer as a single big-endian word.
#[must_use]
pub fn usize_to_word(value: usize) -> String {
    pad_word(&format!("{value:x}"))
}

/// Encodes bytes as lowercase hex without prefix.
#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string, with or without `0x` prefix, into bytes.
///
/// # Errors
///
/// Returns [`CodecError::InvalidHex`] on odd length or non-hex characters.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CodecError> {
    Ok(hex::decode(strip_0x(hex))?)
}

/// Parses one word of hex digits as an unsigned 256-bit integer.
///
/// Accepts raw bytes so callers can slice untrusted input without char
/// boundary concerns.
///
/// # Errors
///
/// Returns [`CodecError::InvalidHex`] if the word is not valid hex, or
/// [`CodecError::InvalidAbiReturn`] if it is not exactly one word long.
pub fn word_to_u256<T: AsRef<[u8]>>(word: T) -> Result<U256, CodecError> {
    let mut buf = [0u8; WORD_BYTES];
    hex::decode_to_slice(word.as_ref(), &mut buf).map_err(|e| match e {
        hex::FromHexError::InvalidStringLength => {
            CodecError::InvalidAbiReturn("word is not 32 bytes")
        }
        other => CodecError::InvalidHex(other),
    })?;
    Ok(U256::from_be_bytes(buf))
}
