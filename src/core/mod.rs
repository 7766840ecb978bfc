//! Core data structures for lecfg.
//!
//! This module contains the foundational types of the resolver:
//! - Capability fields and their values
//! - Schema versions and the option schema of each version
//! - Validated option sets
//! - Build artifacts and the build mode

pub mod artifact;
pub mod field;
pub mod option_set;
pub mod schema;
pub mod version;

pub use artifact::{BuildArtifact, BuildMode};
pub use field::{CapabilityField, FieldDomain, FieldGroup, FieldKind, FieldValue, IntRange, RawValue};
pub use option_set::{ForcedValue, OptionEntry, OptionSet};
pub use schema::{OptionSchema, SchemaError};
pub use version::SchemaVersion;
