//! Claims validation and payload assembly
//!
//! Raw request fields go through [`ClaimsValidator`] first; only its output
//! reaches [`PayloadBuilder`].

pub mod builder;
pub mod validator;

pub use builder::PayloadBuilder;
pub use validator::{ClaimsValidator, IntegerError, ValidatedFields, parse_integer};
