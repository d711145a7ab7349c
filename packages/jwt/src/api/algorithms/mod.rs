//! JWS signing
//!
//! [`core`] assembles the compact token; [`rsa`] and [`ecdsa`] produce the
//! raw signature bytes for each algorithm family.

mod core;
mod ecdsa;
mod rsa;
mod utils;

pub use self::core::{JwsSigner, sign_token};
pub(crate) use self::rsa::RsaSigner;
