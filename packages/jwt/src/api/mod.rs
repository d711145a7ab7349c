//! Token generation API
//!
//! One submodule per pipeline stage, plus the request form state and the
//! pipeline that ties them together.

pub mod algorithms;
pub mod claims;
pub mod generator;
pub mod keys;
pub mod request;
pub mod validation;

pub use algorithms::{JwsSigner, sign_token};
pub use claims::{ClaimsValidator, PayloadBuilder, ValidatedFields};
pub use generator::{TokenGenerator, generate_token};
pub use keys::{KeyEncoding, KeyImporter, PrivateKeyMaterial, RsaJwk, import_key};
pub use request::TokenRequest;
pub use validation::AsyncTokenResult;
