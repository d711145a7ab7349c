//! Big integer <-> JWK field conversion
//!
//! JWK integer fields are the unsigned big-endian bytes of the value with no
//! sign byte and no leading zeros, base64url encoded without padding.

use crate::error::{TokenError, TokenResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rsa::BigUint;

/// Unsigned big-endian bytes of `value`
///
/// Goes through the hex rendering, padded to an even number of nibbles, so a
/// set top bit never gains a sign byte and zero still yields one byte.
#[must_use]
pub fn biguint_to_be_bytes(value: &BigUint) -> Vec<u8> {
    let mut hex_digits = value.to_str_radix(16);
    if hex_digits.len() % 2 == 1 {
        hex_digits.insert(0, '0');
    }
    // to_str_radix only emits [0-9a-f], so decoding cannot fail
    hex::decode(&hex_digits).unwrap_or_else(|_| value.to_bytes_be())
}

/// JWK field encoding of `value`
#[must_use]
pub fn encode_uint(value: &BigUint) -> String {
    URL_SAFE_NO_PAD.encode(biguint_to_be_bytes(value))
}

/// Decode a JWK integer field
///
/// # Errors
/// Returns `TokenError::CryptoSigning` if the field is not unpadded base64url
/// or is empty.
pub fn decode_uint(field: &str, name: &str) -> TokenResult<BigUint> {
    let bytes = URL_SAFE_NO_PAD
        .decode(field)
        .map_err(|e| TokenError::crypto_signing(format!("JWK member {name}: {e}")))?;
    if bytes.is_empty() {
        return Err(TokenError::crypto_signing(format!(
            "JWK member {name} is empty"
        )));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}
