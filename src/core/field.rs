//! Capability fields and their values.
//!
//! A capability field is one configurable dimension of a libethercat build:
//! a size limit, a feature toggle, or a backend choice. Fields are immutable
//! once defined and are shared by every schema version that recognizes them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value kind of a capability field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Integer with an optional range constraint
    IntegerBound,
    /// On/off switch
    BooleanToggle,
    /// One value out of a closed set of strings
    EnumeratedChoice,
}

impl FieldKind {
    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::IntegerBound => "integer-bound",
            FieldKind::BooleanToggle => "boolean-toggle",
            FieldKind::EnumeratedChoice => "enumerated-choice",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What part of the native build a field configures.
///
/// The translator uses the group to pick between the toggle encodings
/// (linkage pair, device enable flag, mailbox disable flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldGroup {
    /// Compile-time resource limit
    Limit,
    /// Shared vs. static library output
    Linkage,
    /// Hardware device backend selection
    DeviceBackend,
    /// Mailbox protocol module
    MailboxProtocol,
}

impl FieldGroup {
    /// Get the group name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::Limit => "limit",
            FieldGroup::Linkage => "linkage",
            FieldGroup::DeviceBackend => "device-backend",
            FieldGroup::MailboxProtocol => "mailbox-protocol",
        }
    }
}

/// Inclusive integer range. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntRange {
    /// Strictly positive integers.
    pub const POSITIVE: IntRange = IntRange {
        min: Some(1),
        max: None,
    };

    /// Check if a value lies within the range.
    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{}..={}", min, max),
            (Some(min), None) => write!(f, ">= {}", min),
            (None, Some(max)) => write!(f, "<= {}", max),
            (None, None) => write!(f, "any integer"),
        }
    }
}

/// Legal values of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDomain {
    Integer(IntRange),
    Toggle,
    Choice(&'static [&'static str]),
}

impl FieldDomain {
    /// The kind of values this domain holds.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldDomain::Integer(_) => FieldKind::IntegerBound,
            FieldDomain::Toggle => FieldKind::BooleanToggle,
            FieldDomain::Choice(_) => FieldKind::EnumeratedChoice,
        }
    }
}

/// A concrete, typed value of a capability field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Bool(bool),
    Choice(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            FieldValue::Choice(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Choice(v) => write!(f, "{}", v),
        }
    }
}

/// An uncoerced override as supplied by a user (CLI `-o` or profile file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl RawValue {
    /// Short description of the raw type for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Int(_) => "integer",
            RawValue::Bool(_) => "boolean",
            RawValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(v) => write!(f, "{}", v),
            RawValue::Bool(v) => write!(f, "{}", v),
            RawValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Str(v.to_string())
    }
}

impl From<FieldValue> for RawValue {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Int(i) => RawValue::Int(i),
            FieldValue::Bool(b) => RawValue::Bool(b),
            FieldValue::Choice(s) => RawValue::Str(s),
        }
    }
}

/// One configurable dimension of the native library build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityField {
    name: &'static str,
    group: FieldGroup,
    domain: FieldDomain,
    default: FieldValue,
    description: &'static str,
}

impl CapabilityField {
    /// A positive integer limit.
    pub fn limit(name: &'static str, default: i64, description: &'static str) -> Self {
        CapabilityField {
            name,
            group: FieldGroup::Limit,
            domain: FieldDomain::Integer(IntRange::POSITIVE),
            default: FieldValue::Int(default),
            description,
        }
    }

    /// A boolean toggle in the given group.
    pub fn toggle(
        name: &'static str,
        group: FieldGroup,
        default: bool,
        description: &'static str,
    ) -> Self {
        CapabilityField {
            name,
            group,
            domain: FieldDomain::Toggle,
            default: FieldValue::Bool(default),
            description,
        }
    }

    /// A device backend choice over a closed set of names.
    pub fn choice(
        name: &'static str,
        values: &'static [&'static str],
        default: &'static str,
        description: &'static str,
    ) -> Self {
        CapabilityField {
            name,
            group: FieldGroup::DeviceBackend,
            domain: FieldDomain::Choice(values),
            default: FieldValue::Choice(default.to_string()),
            description,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> FieldGroup {
        self.group
    }

    pub fn domain(&self) -> &FieldDomain {
        &self.domain
    }

    pub fn kind(&self) -> FieldKind {
        self.domain.kind()
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.default
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Check that a typed value belongs to this field's domain.
    pub fn admits(&self, value: &FieldValue) -> bool {
        match (&self.domain, value) {
            (FieldDomain::Integer(range), FieldValue::Int(v)) => range.contains(*v),
            (FieldDomain::Toggle, FieldValue::Bool(_)) => true,
            (FieldDomain::Choice(values), FieldValue::Choice(v)) => values.contains(&v.as_str()),
            _ => false,
        }
    }

    /// Field name in configure-flag form: `max_slaves` -> `max-slaves`.
    pub fn kebab_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Field name in macro form: `max_groups` -> `LEC_MAX_GROUPS`.
    pub fn macro_name(&self) -> String {
        format!("LEC_{}", self.name.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_range() {
        assert!(IntRange::POSITIVE.contains(1));
        assert!(IntRange::POSITIVE.contains(i64::MAX));
        assert!(!IntRange::POSITIVE.contains(0));
        assert!(!IntRange::POSITIVE.contains(-5));
        assert_eq!(IntRange::POSITIVE.to_string(), ">= 1");
    }

    #[test]
    fn test_bounded_range_display() {
        let range = IntRange {
            min: Some(1),
            max: Some(64),
        };
        assert!(range.contains(64));
        assert!(!range.contains(65));
        assert_eq!(range.to_string(), "1..=64");
    }

    #[test]
    fn test_field_names() {
        let field = CapabilityField::limit("max_eeprom_cat_pdo_entries", 32, "");
        assert_eq!(field.kebab_name(), "max-eeprom-cat-pdo-entries");
        assert_eq!(field.macro_name(), "LEC_MAX_EEPROM_CAT_PDO_ENTRIES");
        assert_eq!(field.kind(), FieldKind::IntegerBound);
    }

    #[test]
    fn test_admits_checks_kind_and_domain() {
        let choice = CapabilityField::choice("ecat_device", &["file", "bpf"], "file", "");
        assert!(choice.admits(&FieldValue::Choice("bpf".to_string())));
        assert!(!choice.admits(&FieldValue::Choice("pikeos".to_string())));
        assert!(!choice.admits(&FieldValue::Bool(true)));

        let toggle = CapabilityField::toggle("shared", FieldGroup::Linkage, true, "");
        assert!(toggle.admits(&FieldValue::Bool(false)));
        assert!(!toggle.admits(&FieldValue::Int(1)));
    }

    #[test]
    fn test_raw_value_deserializes_untagged() {
        #[derive(Deserialize)]
        struct Doc {
            a: RawValue,
            b: RawValue,
            c: RawValue,
        }

        let doc: Doc = toml::from_str("a = 8\nb = false\nc = \"bpf\"").unwrap();
        assert_eq!(doc.a, RawValue::Int(8));
        assert_eq!(doc.b, RawValue::Bool(false));
        assert_eq!(doc.c, RawValue::Str("bpf".to_string()));
    }
}
