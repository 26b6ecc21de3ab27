//! Minimal Solidity ABI codec for the ANS contract.
//!
//! Only the call shapes the resolver needs are supported:
//!
//! - a single `string` argument ([`encode_string_arg`])
//! - a single `address` argument ([`encode_address_arg`])
//! - an `address` return value ([`decode_address_return`])
//! - a dynamic `string` return value ([`decode_string_return`])
//!
//! Encoded arguments are hex bodies without a `0x` prefix; [`encode_call`]
//! prepends the selector and the prefix to produce the final call data.

use std::sync::LazyLock;

use alloy_primitives::{Address, Selector, U256, fixed_bytes, hex};
use regex::Regex;

use crate::error::CodecError;
use crate::hex::{
    WORD_BYTES, WORD_HEX_LEN, bytes_to_hex, pad_word, strip_0x, usize_to_word, word_to_u256,
};

/// Selector of `domains(string)`, returning the owner of a name.
pub const DOMAINS_SELECTOR: Selector = fixed_bytes!("26449235");

/// Selector of `records(string)`, returning the free-form record of a name.
pub const RECORDS_SELECTOR: Selector = fixed_bytes!("541e771d");

/// Selector of `getNameByAddress(address)`, returning the primary name of an address.
pub const GET_NAME_BY_ADDRESS_SELECTOR: Selector = fixed_bytes!("7c80bb4f");

const ADDRESS_BYTES: usize = 20;

static HEX_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^0x[a-fA-F0-9]{40}$").expect("Invalid address pattern"));

/// Returns `true` if `value` is `0x` followed by exactly 40 hex digits.
///
/// Checksums are not validated; any mix of cases is accepted.
#[must_use]
pub fn is_hex_address(value: &str) -> bool {
    HEX_ADDRESS.is_match(value)
}

/// Formats an address as `0x` + 40 lowercase hex digits.
#[must_use]
pub fn to_lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Concatenates a selector and encoded arguments into `0x`-prefixed call data.
#[must_use]
pub fn encode_call(selector: Selector, encoded_args: &str) -> String {
    format!("0x{}{encoded_args}", hex::encode(selector))
}

/// Encodes a single dynamic `string` argument.
///
/// Layout: offset word (always 32), length word, then the UTF-8 bytes
/// right-padded with zeros to a word boundary.
#[must_use]
pub fn encode_string_arg(value: &str) -> String {
    let bytes = value.as_bytes();
    let data = bytes_to_hex(bytes);
    let padded_len = data.len().div_ceil(WORD_HEX_LEN) * WORD_HEX_LEN;

    let mut out = String::with_capacity(2 * WORD_HEX_LEN + padded_len);
    out.push_str(&usize_to_word(WORD_BYTES));
    out.push_str(&usize_to_word(bytes.len()));
    out.push_str(&format!("{data:0<padded_len$}"));
    out
}

/// Encodes a single `address` argument as a left-padded word.
///
/// # Errors
///
/// Returns [`CodecError::InvalidAddress`] if `value` is not a `0x`-prefixed
/// 40 digit hex string.
pub fn encode_address_arg(value: &str) -> Result<String, CodecError> {
    if !is_hex_address(value) {
        return Err(CodecError::InvalidAddress(value.to_owned()));
    }
    Ok(pad_word(&strip_0x(value).to_ascii_lowercase()))
}

/// Decodes an `address` return value from raw call output.
///
/// The address is the low 20 bytes of the first word; the high 12 bytes must
/// be zero. Data past the first word is ignored.
///
/// # Errors
///
/// Returns [`CodecError::InvalidAbiReturn`] if fewer than 64 hex digits are
/// present or the high bytes are set, or [`CodecError::InvalidHex`] if any
/// digit of the word is not hex.
pub fn decode_address_return(data: &str) -> Result<Address, CodecError> {
    let clean = strip_0x(data).as_bytes();
    if clean.len() < WORD_HEX_LEN {
        return Err(CodecError::InvalidAbiReturn("address return shorter than one word"));
    }
    let mut word = [0u8; WORD_BYTES];
    hex::decode_to_slice(&clean[..WORD_HEX_LEN], &mut word)?;
    let (high, low) = word.split_at(WORD_BYTES - ADDRESS_BYTES);
    if high.iter().any(|b| *b != 0) {
        return Err(CodecError::InvalidAbiReturn("address word has non-zero high bytes"));
    }
    Ok(Address::from_slice(low))
}

/// Decodes a dynamic `string` return value from raw call output.
///
/// The head word is the byte offset of the length word; the string bytes
/// follow the length word directly. Every offset and length is bounds-checked
/// against the buffer before anything is sliced.
///
/// # Errors
///
/// Returns [`CodecError::InvalidAbiReturn`] if the head, length word or data
/// region fall outside the buffer or the bytes are not UTF-8, and
/// [`CodecError::InvalidHex`] if the inspected region is not hex.
pub fn decode_string_return(data: &str) -> Result<String, CodecError> {
    let clean = strip_0x(data).as_bytes();
    if clean.len() < WORD_HEX_LEN {
        return Err(CodecError::InvalidAbiReturn("string return shorter than one word"));
    }

    let offset = word_to_usize(&clean[..WORD_HEX_LEN], "string offset out of range")?;
    let len_start = offset
        .checked_mul(2)
        .ok_or(CodecError::InvalidAbiReturn("string offset out of range"))?;
    let len_end = len_start
        .checked_add(WORD_HEX_LEN)
        .filter(|end| *end <= clean.len())
        .ok_or(CodecError::InvalidAbiReturn("string length word truncated"))?;

    let len = word_to_usize(&clean[len_start..len_end], "string length out of range")?;
    let data_end = len
        .checked_mul(2)
        .and_then(|n| n.checked_add(len_end))
        .filter(|end| *end <= clean.len())
        .ok_or(CodecError::InvalidAbiReturn("string data exceeds buffer"))?;

    let bytes = hex::decode(&clean[len_end..data_end])?;
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidAbiReturn("string data is not UTF-8"))
}

fn word_to_usize(word: &[u8], context: &'static str) -> Result<usize, CodecError> {
    let value: U256 = word_to_u256(word)?;
    usize::try_from(value).map_err(|_| CodecError::InvalidAbiReturn(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::{SolCall, SolValue, sol};

    sol! {
        function domains(string name) external view returns (address);
        function records(string name) external view returns (string);
        function getNameByAddress(address addr) external view returns (string);
    }

    fn with_head(encoded_arg: &str) -> String {
        format!("0x{encoded_arg}")
    }

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(DOMAINS_SELECTOR.0, domainsCall::SELECTOR);
        assert_eq!(RECORDS_SELECTOR.0, recordsCall::SELECTOR);
        assert_eq!(GET_NAME_BY_ADDRESS_SELECTOR.0, getNameByAddressCall::SELECTOR);
    }

    #[test]
    fn test_encode_string_call_matches_solidity() {
        let (n31, n32, n33) = ("x".repeat(31), "y".repeat(32), "z".repeat(33));
        for name in ["", "a", "foo", n31.as_str(), n32.as_str(), n33.as_str()] {
            let expected = recordsCall {
                name: name.to_owned(),
            }
            .abi_encode();
            let ours = encode_call(RECORDS_SELECTOR, &encode_string_arg(name));
            assert_eq!(ours, format!("0x{}", hex::encode(&expected)), "name {name:?}");
        }
    }

    #[test]
    fn test_encode_string_arg_layout() {
        let encoded = encode_string_arg("foo");
        assert_eq!(encoded.len(), 3 * WORD_HEX_LEN);
        assert_eq!(&encoded[..WORD_HEX_LEN], usize_to_word(32));
        assert_eq!(&encoded[WORD_HEX_LEN..2 * WORD_HEX_LEN], usize_to_word(3));
        assert!(encoded[2 * WORD_HEX_LEN..].starts_with("666f6f00"));
    }

    #[test]
    fn test_encode_empty_string_has_no_data_words() {
        assert_eq!(encode_string_arg("").len(), 2 * WORD_HEX_LEN);
    }

    #[test]
    fn test_encode_address_call_matches_solidity() {
        let addr = address!("86a282845a61302Ba4735d111b1a1417f6e617Ad");
        let expected = getNameByAddressCall { addr }.abi_encode();
        let ours = encode_call(
            GET_NAME_BY_ADDRESS_SELECTOR,
            &encode_address_arg("0x86a282845a61302Ba4735d111b1a1417f6e617Ad").unwrap(),
        );
        assert_eq!(ours, format!("0x{}", hex::encode(&expected)));
    }

    #[test]
    fn test_encode_address_arg_rejects_bad_shapes() {
        for bad in [
            "",
            "0x",
            "86a282845a61302ba4735d111b1a1417f6e617ad",
            "0x86a282845a61302ba4735d111b1a1417f6e617a",
            "0x86a282845a61302ba4735d111b1a1417f6e617adf",
            "0x86a282845a61302ba4735d111b1a1417f6e617zz",
            " 0x86a282845a61302ba4735d111b1a1417f6e617ad",
        ] {
            assert!(
                matches!(encode_address_arg(bad), Err(CodecError::InvalidAddress(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_decode_address_return_short_buffer() {
        let short = format!("0x{}", "0".repeat(63));
        assert!(matches!(
            decode_address_return(&short),
            Err(CodecError::InvalidAbiReturn(_))
        ));
        assert!(matches!(
            decode_address_return("0x"),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_address_return_checks_whole_word() {
        let non_hex_padding = format!("0x{}{}", "zz".repeat(12), "11".repeat(20));
        assert!(matches!(
            decode_address_return(&non_hex_padding),
            Err(CodecError::InvalidHex(_))
        ));
        let dirty_padding = format!("0x{}{}", "01".repeat(12), "11".repeat(20));
        assert!(matches!(
            decode_address_return(&dirty_padding),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_address_return_one() {
        let word = format!("0x{}1", "0".repeat(63));
        let addr = decode_address_return(&word).unwrap();
        assert_eq!(
            to_lower_hex(&addr),
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_decode_address_return_matches_solidity() {
        let owner = address!("Ab5801a7D398351b8bE11C439e05C5B3259aeC9B");
        let raw = format!("0x{}", hex::encode((owner,).abi_encode_params()));
        assert_eq!(decode_address_return(&raw).unwrap(), owner);
        assert_eq!(
            to_lower_hex(&decode_address_return(&raw).unwrap()),
            "0xab5801a7d398351b8be11c439e05c5b3259aec9b"
        );
    }

    #[test]
    fn test_string_roundtrip_through_return_layout() {
        let (n31, n32, n33) = ("x".repeat(31), "y".repeat(32), "z".repeat(33));
        for value in [
            "",
            "a",
            "bar",
            "héllo wörld",
            "名前",
            n31.as_str(),
            n32.as_str(),
            n33.as_str(),
        ] {
            let raw = with_head(&encode_string_arg(value));
            assert_eq!(decode_string_return(&raw).unwrap(), value);
        }
    }

    #[test]
    fn test_decode_string_return_matches_solidity() {
        let raw = format!(
            "0x{}",
            hex::encode(("0x1111111111111111111111111111111111111111".to_owned(),).abi_encode_params())
        );
        assert_eq!(
            decode_string_return(&raw).unwrap(),
            "0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_decode_string_return_respects_non_standard_offset() {
        let raw = format!(
            "{}{}{}{}",
            usize_to_word(64),
            "f".repeat(WORD_HEX_LEN),
            usize_to_word(2),
            pad_word("").replacen("0000", "6869", 1)
        );
        assert_eq!(decode_string_return(&raw).unwrap(), "hi");
    }

    #[test]
    fn test_decode_string_return_offset_out_of_range() {
        let raw = format!("{}{}", usize_to_word(4096), usize_to_word(0));
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_string_return_huge_offset() {
        let raw = format!("{}{}", "f".repeat(WORD_HEX_LEN), usize_to_word(0));
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_string_return_truncated_length_word() {
        let raw = format!("{}{}", usize_to_word(32), &usize_to_word(3)[..40]);
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_string_return_data_past_end() {
        let raw = format!("{}{}{}", usize_to_word(32), usize_to_word(40), pad_word(""));
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_string_return_huge_length() {
        let raw = format!("{}{}", usize_to_word(32), "f".repeat(WORD_HEX_LEN));
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_string_return_invalid_utf8() {
        let raw = format!(
            "{}{}{}",
            usize_to_word(32),
            usize_to_word(2),
            pad_word("").replacen("0000", "fffe", 1)
        );
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidAbiReturn(_))
        ));
    }

    #[test]
    fn test_decode_string_return_non_hex() {
        let raw = format!("{}{}zz", usize_to_word(32), usize_to_word(1));
        assert!(matches!(
            decode_string_return(&raw),
            Err(CodecError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_decode_string_return_non_ascii_input_does_not_panic() {
        let raw = format!("{}é", "0".repeat(WORD_HEX_LEN - 1));
        assert!(decode_string_return(&raw).is_err());
        assert!(decode_address_return(&raw).is_err());
    }
}
