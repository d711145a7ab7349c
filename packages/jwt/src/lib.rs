//! Signed access tokens for a multi-tenant platform
//!
//! This crate turns operator-supplied fields into a compact JWS:
//! - Claims validation (tenant, plan, space grants, expiry)
//! - PEM private key import (PKCS#8, RSA PKCS#1)
//! - RS*, PS* and ES* signatures
//!
//! ```no_run
//! use jwtsmith_jwt::{SigningAlgorithm, TokenGenerator, TokenRequest};
//!
//! # async fn demo(pem: String) -> jwtsmith_jwt::TokenResult<()> {
//! let request = TokenRequest::new()
//!     .with_tenant_id("42")
//!     .with_user_id("u1")
//!     .with_private_key(pem)
//!     .with_algorithm(SigningAlgorithm::RS256);
//! let token = TokenGenerator::new().generate(&request).await?;
//! println!("{token}");
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod api;
mod error;
pub mod expiry;
mod types;

pub use algorithms::{HashAlgorithm, SignatureScheme, SigningAlgorithm, UnknownAlgorithm};
pub use api::{
    AsyncTokenResult, ClaimsValidator, JwsSigner, KeyEncoding, KeyImporter, PayloadBuilder,
    PrivateKeyMaterial, RsaJwk, TokenGenerator, TokenRequest, ValidatedFields,
    generate_token,
};
pub use error::*;
pub use types::*;
