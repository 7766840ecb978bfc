//! lecfg - build-configuration resolver for libethercat
//!
//! This crate turns a declarative set of capability options (resource
//! limits, device backends, mailbox protocols) into the configure flags and
//! preprocessor macros a libethercat build needs. Each historical option
//! schema stays selectable as a [`SchemaVersion`].

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for lecfg unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    artifact::BuildArtifact, artifact::BuildMode, option_set::OptionSet, schema::OptionSchema,
    version::SchemaVersion,
};

pub use builder::translate;
pub use resolver::validate;
