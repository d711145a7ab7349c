//! RSA JWS signatures (RS256/384/512 and PS256/384/512)

use crate::{
    algorithms::SigningAlgorithm,
    error::{TokenError, TokenResult},
};
use rsa::{
    RsaPrivateKey,
    pkcs1v15, pss,
    rand_core::OsRng,
    signature::{RandomizedSigner, SignatureEncoding, Signer},
};
use sha2::{Sha256, Sha384, Sha512};

/// RSA private key wrapped once for the algorithm it was imported for
///
/// PSS uses MGF1 with the same hash and a salt as long as the digest.
pub(crate) enum RsaSigner {
    Rs256(pkcs1v15::SigningKey<Sha256>),
    Rs384(pkcs1v15::SigningKey<Sha384>),
    Rs512(pkcs1v15::SigningKey<Sha512>),
    Ps256(pss::BlindedSigningKey<Sha256>),
    Ps384(pss::BlindedSigningKey<Sha384>),
    Ps512(pss::BlindedSigningKey<Sha512>),
}

impl RsaSigner {
    /// Take ownership of `key` for signing with `algorithm`
    ///
    /// # Errors
    /// Returns `TokenError::CryptoSigning` for non-RSA algorithms.
    pub(crate) fn new(algorithm: SigningAlgorithm, key: RsaPrivateKey) -> TokenResult<Self> {
        let salt_len = algorithm.pss_salt_len();
        let signer = match algorithm {
            SigningAlgorithm::RS256 => Self::Rs256(pkcs1v15::SigningKey::new(key)),
            SigningAlgorithm::RS384 => Self::Rs384(pkcs1v15::SigningKey::new(key)),
            SigningAlgorithm::RS512 => Self::Rs512(pkcs1v15::SigningKey::new(key)),
            SigningAlgorithm::PS256 => {
                Self::Ps256(pss::BlindedSigningKey::new_with_salt_len(key, salt_len))
            }
            SigningAlgorithm::PS384 => {
                Self::Ps384(pss::BlindedSigningKey::new_with_salt_len(key, salt_len))
            }
            SigningAlgorithm::PS512 => {
                Self::Ps512(pss::BlindedSigningKey::new_with_salt_len(key, salt_len))
            }
            SigningAlgorithm::ES256 | SigningAlgorithm::ES384 | SigningAlgorithm::ES512 => {
                return Err(TokenError::crypto_signing(format!(
                    "RSA key cannot sign {algorithm}"
                )));
            }
        };
        Ok(signer)
    }

    /// Sign `message`, returning the raw signature bytes
    ///
    /// # Errors
    /// Returns `TokenError::CryptoSigning` if the RSA primitive fails.
    pub(crate) fn sign(&self, message: &[u8]) -> TokenResult<Vec<u8>> {
        match self {
            Self::Rs256(key) => pkcs1v15_sign(key, message),
            Self::Rs384(key) => pkcs1v15_sign(key, message),
            Self::Rs512(key) => pkcs1v15_sign(key, message),
            Self::Ps256(key) => pss_sign(key, message),
            Self::Ps384(key) => pss_sign(key, message),
            Self::Ps512(key) => pss_sign(key, message),
        }
    }
}

fn pkcs1v15_sign<S>(key: &S, message: &[u8]) -> TokenResult<Vec<u8>>
where
    S: Signer<pkcs1v15::Signature>,
{
    key.try_sign(message)
        .map(|sig| sig.to_vec())
        .map_err(TokenError::crypto_signing)
}

fn pss_sign<S>(key: &S, message: &[u8]) -> TokenResult<Vec<u8>>
where
    S: RandomizedSigner<pss::Signature>,
{
    key.try_sign_with_rng(&mut OsRng, message)
        .map(|sig| sig.to_vec())
        .map_err(TokenError::crypto_signing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::{RsaPublicKey, pkcs8::DecodePrivateKey, signature::Verifier};

    const PKCS8: &str = include_str!("../../../tests/fixtures/rsa_pkcs8.pem");

    fn key() -> RsaPrivateKey {
        RsaPrivateKey::from_pkcs8_pem(PKCS8).expect("fixture key")
    }

    fn public() -> RsaPublicKey {
        key().to_public_key()
    }

    #[test]
    fn pkcs1v15_signature_verifies_and_is_deterministic() {
        let signer = RsaSigner::new(SigningAlgorithm::RS384, key()).expect("rsa algorithm");
        let first = signer.sign(b"payload").expect("sign");
        let second = signer.sign(b"payload").expect("sign");
        assert_eq!(first, second);
        assert_eq!(first.len(), 256);

        let verifier = pkcs1v15::VerifyingKey::<Sha384>::new(public());
        let sig = pkcs1v15::Signature::try_from(first.as_slice()).expect("signature bytes");
        assert!(verifier.verify(b"payload", &sig).is_ok());
    }

    #[test]
    fn pss_signature_verifies_with_digest_length_salt() {
        let signer = RsaSigner::new(SigningAlgorithm::PS512, key()).expect("rsa algorithm");
        let bytes = signer.sign(b"payload").expect("sign");
        let verifier = pss::VerifyingKey::<Sha512>::new(public());
        let sig = pss::Signature::try_from(bytes.as_slice()).expect("signature bytes");
        assert!(verifier.verify(b"payload", &sig).is_ok());
        assert!(verifier.verify(b"tampered", &sig).is_err());
    }

    #[test]
    fn one_signer_serves_repeated_pss_signatures() {
        let signer = RsaSigner::new(SigningAlgorithm::PS256, key()).expect("rsa algorithm");
        let first = signer.sign(b"payload").expect("sign");
        let second = signer.sign(b"payload").expect("sign");
        // random salt, so the signatures differ but both verify
        assert_ne!(first, second);

        let verifier = pss::VerifyingKey::<Sha256>::new(public());
        for bytes in [first, second] {
            let sig = pss::Signature::try_from(bytes.as_slice()).expect("signature bytes");
            assert!(verifier.verify(b"payload", &sig).is_ok());
        }
    }

    #[test]
    fn ecdsa_algorithms_are_refused() {
        assert!(matches!(
            RsaSigner::new(SigningAlgorithm::ES256, key()),
            Err(TokenError::CryptoSigning { .. })
        ));
    }
}
