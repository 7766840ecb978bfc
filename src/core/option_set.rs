//! Validated option sets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::field::{CapabilityField, FieldValue, RawValue};
use crate::core::version::SchemaVersion;

/// One field of an option set together with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub field: CapabilityField,
    pub value: FieldValue,
}

/// A value the device backend policy changed during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedValue {
    pub field: &'static str,
    pub requested: FieldValue,
    pub forced: FieldValue,
}

/// A concrete value for every field of one schema, in declaration order.
///
/// Option sets are only produced by [`crate::resolver::validate`] and are
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct OptionSet {
    version: SchemaVersion,
    entries: Vec<OptionEntry>,
    forced: Vec<ForcedValue>,
}

impl OptionSet {
    pub(crate) fn new(
        version: SchemaVersion,
        entries: Vec<OptionEntry>,
        forced: Vec<ForcedValue>,
    ) -> Self {
        OptionSet {
            version,
            entries,
            forced,
        }
    }

    /// The schema version this set was validated against.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Entries in schema declaration order.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Resolved value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|e| e.field.name() == name)
            .map(|e| &e.value)
    }

    /// Values changed by the device backend policy.
    pub fn forced(&self) -> &[ForcedValue] {
        &self.forced
    }

    /// The resolved values as an override map, suitable for re-validation.
    pub fn to_overrides(&self) -> BTreeMap<String, RawValue> {
        self.entries
            .iter()
            .map(|e| (e.field.name().to_string(), RawValue::from(e.value.clone())))
            .collect()
    }
}

/// Two option sets are equal when they assign the same values under the same
/// version. The forced-value log is not part of the identity.
impl PartialEq for OptionSet {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.entries == other.entries
    }
}

impl Eq for OptionSet {}
