//! ECDSA JWS signatures (ES256, ES384, ES512)
//!
//! JWS wants the raw fixed-width `r || s` form, not DER.

use crate::error::{TokenError, TokenResult};
use p256::ecdsa::signature::Signer;

/// ES256: P-256 with SHA-256, 64 byte signature
pub(crate) fn sign_es256(message: &[u8], key: &p256::ecdsa::SigningKey) -> TokenResult<Vec<u8>> {
    let signature: p256::ecdsa::Signature =
        key.try_sign(message).map_err(TokenError::crypto_signing)?;
    Ok(signature.to_bytes().to_vec())
}

/// ES384: P-384 with SHA-384, 96 byte signature
pub(crate) fn sign_es384(message: &[u8], key: &p384::ecdsa::SigningKey) -> TokenResult<Vec<u8>> {
    let signature: p384::ecdsa::Signature =
        key.try_sign(message).map_err(TokenError::crypto_signing)?;
    Ok(signature.to_bytes().to_vec())
}

/// ES512: P-521 with SHA-512, 132 byte signature
pub(crate) fn sign_es512(message: &[u8], key: &p521::ecdsa::SigningKey) -> TokenResult<Vec<u8>> {
    let signature: p521::ecdsa::Signature =
        key.try_sign(message).map_err(TokenError::crypto_signing)?;
    Ok(signature.to_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::{ecdsa::signature::Verifier, pkcs8::DecodePrivateKey};

    #[test]
    fn es256_is_raw_and_verifies() {
        let key = p256::ecdsa::SigningKey::from_pkcs8_pem(include_str!(
            "../../../tests/fixtures/ec_p256_pkcs8.pem"
        ))
        .expect("fixture key");
        let bytes = sign_es256(b"payload", &key).expect("sign");
        assert_eq!(bytes.len(), 64);

        let sig = p256::ecdsa::Signature::from_slice(&bytes).expect("r||s");
        assert!(key.verifying_key().verify(b"payload", &sig).is_ok());
    }

    #[test]
    fn es384_is_raw_and_verifies() {
        let key = p384::ecdsa::SigningKey::from_pkcs8_pem(include_str!(
            "../../../tests/fixtures/ec_p384_pkcs8.pem"
        ))
        .expect("fixture key");
        let bytes = sign_es384(b"payload", &key).expect("sign");
        assert_eq!(bytes.len(), 96);

        let sig = p384::ecdsa::Signature::from_slice(&bytes).expect("r||s");
        assert!(key.verifying_key().verify(b"payload", &sig).is_ok());
    }

    #[test]
    fn es512_is_raw_and_verifies() {
        let secret = p521::SecretKey::from_pkcs8_pem(include_str!(
            "../../../tests/fixtures/ec_p521_pkcs8.pem"
        ))
        .expect("fixture key");
        let key = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes()).expect("scalar");
        let bytes = sign_es512(b"payload", &key).expect("sign");
        assert_eq!(bytes.len(), 132);

        let verifying = p521::ecdsa::VerifyingKey::from(&key);
        let sig = p521::ecdsa::Signature::from_slice(&bytes).expect("r||s");
        assert!(verifying.verify(b"payload", &sig).is_ok());
    }
}
