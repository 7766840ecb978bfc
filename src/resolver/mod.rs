//! Option validation.
//!
//! The resolver turns user overrides into an immutable [`OptionSet`]. It is
//! pure and deterministic: all file and CLI input is gathered before it runs,
//! and a failure aborts before any artifact is produced.
//!
//! [`OptionSet`]: crate::core::OptionSet

pub mod errors;
pub mod validate;

pub use errors::ValidationError;
pub use validate::validate;
