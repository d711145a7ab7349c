//! Private key import
//!
//! PEM text is classified once into a [`KeyEncoding`] and then handled per
//! encoding:
//!
//! - PKCS#8 is imported directly for the algorithm's key type.
//! - RSA PKCS#1 is decoded into an [`RsaJwk`] and imported from that.
//! - EC PKCS#1 (SEC1) is rejected; convert it to PKCS#8 first.
//! - Anything else is rejected.

pub mod bigint;
pub mod encoding;
pub mod jwk;

pub use encoding::KeyEncoding;
pub use jwk::RsaJwk;

use crate::{
    algorithms::{SignatureScheme, SigningAlgorithm},
    api::algorithms::RsaSigner,
    error::{TokenError, TokenResult},
};
use rsa::{RsaPrivateKey, pkcs8::DecodePrivateKey};
use std::fmt;

/// Key material behind a [`PrivateKeyMaterial`]
pub(crate) enum KeyInner {
    Rsa(Box<RsaSigner>),
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

/// Signing key bound to one algorithm
///
/// Produced by [`KeyImporter`], consumed by the signer. Never persisted.
pub struct PrivateKeyMaterial {
    algorithm: SigningAlgorithm,
    encoding: KeyEncoding,
    inner: KeyInner,
}

impl PrivateKeyMaterial {
    /// Algorithm this key was imported for
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Encoding the key was imported from
    #[must_use]
    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    pub(crate) fn inner(&self) -> &KeyInner {
        &self.inner
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.inner {
            KeyInner::Rsa(_) => "RSA",
            KeyInner::P256(_) => "P-256",
            KeyInner::P384(_) => "P-384",
            KeyInner::P521(_) => "P-521",
        };
        f.debug_struct("PrivateKeyMaterial")
            .field("algorithm", &self.algorithm)
            .field("encoding", &self.encoding)
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

/// PEM private key importer
///
/// Stateless: every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyImporter;

impl KeyImporter {
    /// Create a new importer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Import `pem` as a signing key for `algorithm`
    ///
    /// # Errors
    /// - `TokenError::UnsupportedKeyFormat` for EC PKCS#1 or unrecognised headers
    /// - `TokenError::CryptoSigning` when the key is malformed or does not
    ///   match the algorithm
    pub fn import(&self, pem: &str, algorithm: SigningAlgorithm) -> TokenResult<PrivateKeyMaterial> {
        let pem = pem.trim();
        let encoding = KeyEncoding::detect(pem);
        tracing::debug!(?encoding, %algorithm, "importing private key");

        let inner = match encoding {
            KeyEncoding::Pkcs8 => import_pkcs8(pem, algorithm)?,
            KeyEncoding::Pkcs1Ec => {
                return Err(TokenError::unsupported_key_format(
                    "EC PKCS#1 not supported; use PKCS#8",
                ));
            }
            KeyEncoding::Pkcs1Rsa => {
                let jwk = RsaJwk::from_pkcs1_pem(pem, algorithm)?;
                let key = jwk.to_private_key()?;
                KeyInner::Rsa(Box::new(RsaSigner::new(algorithm, key)?))
            }
            KeyEncoding::Unknown => {
                return Err(TokenError::unsupported_key_format("unrecognized PEM header"));
            }
        };

        Ok(PrivateKeyMaterial {
            algorithm,
            encoding,
            inner,
        })
    }
}

fn import_pkcs8(pem: &str, algorithm: SigningAlgorithm) -> TokenResult<KeyInner> {
    let mismatch = |e: &dyn fmt::Display| {
        TokenError::crypto_signing(format!("key is not usable with {algorithm}: {e}"))
    };

    match (algorithm.scheme(), algorithm) {
        (SignatureScheme::RsaPkcs1v15 | SignatureScheme::RsaPss, _) => {
            let key = RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| mismatch(&e))?;
            RsaSigner::new(algorithm, key).map(|signer| KeyInner::Rsa(Box::new(signer)))
        }
        (SignatureScheme::Ecdsa, SigningAlgorithm::ES256) => {
            p256::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(KeyInner::P256)
                .map_err(|e| mismatch(&e))
        }
        (SignatureScheme::Ecdsa, SigningAlgorithm::ES384) => {
            p384::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(KeyInner::P384)
                .map_err(|e| mismatch(&e))
        }
        (SignatureScheme::Ecdsa, _) => {
            let secret = p521::SecretKey::from_pkcs8_pem(pem).map_err(|e| mismatch(&e))?;
            p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                .map(KeyInner::P521)
                .map_err(|e| mismatch(&e))
        }
    }
}

/// Import on the blocking pool so RSA parsing never stalls the caller's runtime
///
/// # Errors
/// Same as [`KeyImporter::import`], plus `TokenError::Internal` if the
/// blocking task dies.
pub async fn import_key(pem: String, algorithm: SigningAlgorithm) -> TokenResult<PrivateKeyMaterial> {
    let pem = zeroize::Zeroizing::new(pem);
    tokio::task::spawn_blocking(move || KeyImporter::new().import(&pem, algorithm))
        .await
        .map_err(|e| TokenError::internal(&format!("key import task failed: {e}")))?
}
