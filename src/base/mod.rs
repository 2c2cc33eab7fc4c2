//! Base types and error handling.
//!
//! - [`ProfileError`]: failures of profile lookup, validation, and boundary generation

pub mod profileerror;

pub use profileerror::ProfileError;
