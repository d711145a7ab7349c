//! Signing algorithm identifiers
//!
//! The JWS `alg` names map onto a hash function (from the numeric suffix) and
//! a signature scheme (from the two letter prefix).

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// JWS signature algorithms accepted by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
    /// ECDSA P-256 with SHA-256
    ES256,
    /// ECDSA P-384 with SHA-384
    ES384,
    /// ECDSA P-521 with SHA-512
    ES512,
    /// RSASSA-PSS with SHA-256
    PS256,
    /// RSASSA-PSS with SHA-384
    PS384,
    /// RSASSA-PSS with SHA-512
    PS512,
}

/// Hash function selected by an algorithm's numeric suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Digest output length in bytes
    #[inline]
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

/// Signature scheme selected by an algorithm's prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// RSASSA-PKCS1-v1_5
    RsaPkcs1v15,
    /// RSASSA-PSS, salt length equal to the digest length
    RsaPss,
    /// ECDSA
    Ecdsa,
}

impl SigningAlgorithm {
    /// All algorithms in presentation order
    pub const ALL: [SigningAlgorithm; 9] = [
        SigningAlgorithm::RS256,
        SigningAlgorithm::RS384,
        SigningAlgorithm::RS512,
        SigningAlgorithm::ES256,
        SigningAlgorithm::ES384,
        SigningAlgorithm::ES512,
        SigningAlgorithm::PS256,
        SigningAlgorithm::PS384,
        SigningAlgorithm::PS512,
    ];

    /// Header `alg` value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SigningAlgorithm::RS256 => "RS256",
            SigningAlgorithm::RS384 => "RS384",
            SigningAlgorithm::RS512 => "RS512",
            SigningAlgorithm::ES256 => "ES256",
            SigningAlgorithm::ES384 => "ES384",
            SigningAlgorithm::ES512 => "ES512",
            SigningAlgorithm::PS256 => "PS256",
            SigningAlgorithm::PS384 => "PS384",
            SigningAlgorithm::PS512 => "PS512",
        }
    }

    /// Hash function for this algorithm
    #[must_use]
    pub fn hash(self) -> HashAlgorithm {
        match self {
            SigningAlgorithm::RS256 | SigningAlgorithm::ES256 | SigningAlgorithm::PS256 => {
                HashAlgorithm::Sha256
            }
            SigningAlgorithm::RS384 | SigningAlgorithm::ES384 | SigningAlgorithm::PS384 => {
                HashAlgorithm::Sha384
            }
            SigningAlgorithm::RS512 | SigningAlgorithm::ES512 | SigningAlgorithm::PS512 => {
                HashAlgorithm::Sha512
            }
        }
    }

    /// Signature scheme for this algorithm
    #[must_use]
    pub fn scheme(self) -> SignatureScheme {
        match self {
            SigningAlgorithm::RS256 | SigningAlgorithm::RS384 | SigningAlgorithm::RS512 => {
                SignatureScheme::RsaPkcs1v15
            }
            SigningAlgorithm::PS256 | SigningAlgorithm::PS384 | SigningAlgorithm::PS512 => {
                SignatureScheme::RsaPss
            }
            SigningAlgorithm::ES256 | SigningAlgorithm::ES384 | SigningAlgorithm::ES512 => {
                SignatureScheme::Ecdsa
            }
        }
    }

    /// Whether this algorithm needs an RSA key
    #[inline]
    #[must_use]
    pub fn is_rsa(self) -> bool {
        !matches!(self.scheme(), SignatureScheme::Ecdsa)
    }

    /// PSS salt length in bytes (the digest length)
    #[inline]
    #[must_use]
    pub fn pss_salt_len(self) -> usize {
        self.hash().output_len()
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown `alg` name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signing algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for SigningAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SigningAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}
