//! Option schemas: the ordered field set of one schema version.
//!
//! Schemas are process-wide constants. [`OptionSchema::for_version`] builds
//! each one on first use and hands out a shared reference afterwards, so
//! callers never need to construct or lock them.

use std::collections::HashSet;
use std::sync::LazyLock;

use thiserror::Error;

use crate::core::field::{CapabilityField, FieldGroup, FieldKind};
use crate::core::version::SchemaVersion;

/// Well-known field names.
pub mod names {
    pub const SHARED: &str = "shared";
    pub const ECAT_DEVICE: &str = "ecat_device";
    pub const HW_DEVICE_FILE: &str = "hw_device_file";
    pub const HW_DEVICE_SOCK_RAW: &str = "hw_device_sock_raw";
    pub const HW_DEVICE_SOCK_RAW_MMAPED: &str = "hw_device_sock_raw_mmaped";
    pub const HW_DEVICE_BPF: &str = "hw_device_bpf";
    pub const HW_DEVICE_PIKEOS: &str = "hw_device_pikeos";
    pub const MBX_SUPPORT_EOE: &str = "mbx_support_eoe";
    pub const MBX_SUPPORT_FOE: &str = "mbx_support_foe";
    pub const MBX_SUPPORT_SOE: &str = "mbx_support_soe";
    pub const MAX_COE_EMERGENCY_MSG_LEN: &str = "max_coe_emergency_msg_len";
}

/// Legal values of the `ecat_device` choice.
pub const DEVICE_BACKENDS: &[&str] = &["file", "socket-raw", "socket-raw-mmapped", "bpf", "pikeos"];

/// The device backend value that excludes every other backend.
pub const PIKEOS_BACKEND: &str = "pikeos";

/// The device toggle that enables the same backend as an `ecat_device` value.
pub fn device_toggle_for(backend: &str) -> Option<&'static str> {
    match backend {
        "file" => Some(names::HW_DEVICE_FILE),
        "socket-raw" => Some(names::HW_DEVICE_SOCK_RAW),
        "socket-raw-mmapped" => Some(names::HW_DEVICE_SOCK_RAW_MMAPED),
        "bpf" => Some(names::HW_DEVICE_BPF),
        "pikeos" => Some(names::HW_DEVICE_PIKEOS),
        _ => None,
    }
}

/// Limits shared by every version, with the defaults libethercat ships.
const LIMITS: &[(&str, i64, &str)] = &[
    ("max_slaves", 256, "maximum number of slaves on the bus"),
    ("max_groups", 8, "maximum number of process data groups"),
    ("max_pdlen", 3036, "maximum process data length in bytes"),
    ("max_mbx_entries", 16, "maximum queued mailbox entries"),
    ("max_init_cmd_data", 2048, "maximum init command payload in bytes"),
    ("max_slave_fmmu", 8, "maximum FMMUs per slave"),
    ("max_slave_sm", 8, "maximum sync managers per slave"),
    ("max_datagrams", 100, "maximum datagrams in flight"),
    ("max_eeprom_cat_sm", 8, "maximum EEPROM sync manager category entries"),
    ("max_eeprom_cat_fmmu", 8, "maximum EEPROM FMMU category entries"),
    ("max_eeprom_cat_pdo", 128, "maximum EEPROM PDO category entries"),
    ("max_eeprom_cat_pdo_entries", 32, "maximum entries per EEPROM PDO"),
    ("max_eeprom_cat_strings", 128, "maximum EEPROM string category entries"),
    ("max_eeprom_cat_dc", 8, "maximum EEPROM distributed clock entries"),
    ("max_string_len", 128, "maximum string length"),
    ("max_data", 4096, "maximum generic data buffer size"),
    ("max_ds402_subdevs", 4, "maximum DS402 sub-devices per slave"),
    ("max_coe_emergencies", 10, "maximum stored CoE emergency messages"),
];

/// Schema construction error. Only reachable through a broken field table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate field `{field}` in schema `{version}`")]
    DuplicateField {
        field: &'static str,
        version: SchemaVersion,
    },

    #[error("default of field `{field}` in schema `{version}` violates its own constraint")]
    InvalidDefault {
        field: &'static str,
        version: SchemaVersion,
    },
}

/// Ordered collection of capability fields for one schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSchema {
    version: SchemaVersion,
    fields: Vec<CapabilityField>,
}

static FLAGS: LazyLock<OptionSchema> = LazyLock::new(|| builtin(SchemaVersion::Flags));
static MACROS: LazyLock<OptionSchema> = LazyLock::new(|| builtin(SchemaVersion::Macros));
static DEVICE_CHOICE: LazyLock<OptionSchema> =
    LazyLock::new(|| builtin(SchemaVersion::DeviceChoice));
static DEVICE_TOGGLES: LazyLock<OptionSchema> =
    LazyLock::new(|| builtin(SchemaVersion::DeviceToggles));
static MAILBOX: LazyLock<OptionSchema> = LazyLock::new(|| builtin(SchemaVersion::Mailbox));

fn builtin(version: SchemaVersion) -> OptionSchema {
    OptionSchema::new(version, builtin_fields(version))
        .unwrap_or_else(|e| panic!("built-in schema is inconsistent: {}", e))
}

fn builtin_fields(version: SchemaVersion) -> Vec<CapabilityField> {
    let mut fields = vec![CapabilityField::toggle(
        names::SHARED,
        FieldGroup::Linkage,
        true,
        "build a shared library instead of a static one",
    )];

    match version {
        SchemaVersion::Flags => {}
        SchemaVersion::Macros | SchemaVersion::DeviceChoice => {
            fields.push(CapabilityField::choice(
                names::ECAT_DEVICE,
                DEVICE_BACKENDS,
                "socket-raw",
                "hardware device backend",
            ));
        }
        SchemaVersion::DeviceToggles | SchemaVersion::Mailbox => {
            fields.extend(device_toggles());
        }
    }

    if version == SchemaVersion::Mailbox {
        fields.extend(mailbox_toggles());
    }

    fields.extend(
        LIMITS
            .iter()
            .map(|&(name, default, description)| CapabilityField::limit(name, default, description)),
    );

    if version == SchemaVersion::Mailbox {
        fields.push(CapabilityField::limit(
            names::MAX_COE_EMERGENCY_MSG_LEN,
            32,
            "maximum length of a stored CoE emergency message",
        ));
    }

    fields
}

fn device_toggles() -> Vec<CapabilityField> {
    let group = FieldGroup::DeviceBackend;
    vec![
        CapabilityField::toggle(names::HW_DEVICE_FILE, group, true, "character device backend"),
        CapabilityField::toggle(names::HW_DEVICE_SOCK_RAW, group, true, "raw socket backend"),
        CapabilityField::toggle(
            names::HW_DEVICE_SOCK_RAW_MMAPED,
            group,
            true,
            "memory-mapped raw socket backend",
        ),
        CapabilityField::toggle(names::HW_DEVICE_BPF, group, false, "BPF backend"),
        CapabilityField::toggle(names::HW_DEVICE_PIKEOS, group, false, "PikeOS backend"),
    ]
}

fn mailbox_toggles() -> Vec<CapabilityField> {
    let group = FieldGroup::MailboxProtocol;
    vec![
        CapabilityField::toggle(names::MBX_SUPPORT_EOE, group, true, "Ethernet over EtherCAT"),
        CapabilityField::toggle(names::MBX_SUPPORT_FOE, group, true, "File access over EtherCAT"),
        CapabilityField::toggle(names::MBX_SUPPORT_SOE, group, true, "Servo profile over EtherCAT"),
    ]
}

impl OptionSchema {
    /// Build a schema, checking that names are unique and defaults are legal.
    pub fn new(version: SchemaVersion, fields: Vec<CapabilityField>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    field: field.name(),
                    version,
                });
            }
            if !field.admits(field.default_value()) {
                return Err(SchemaError::InvalidDefault {
                    field: field.name(),
                    version,
                });
            }
        }

        Ok(OptionSchema { version, fields })
    }

    /// The shared built-in schema for a version.
    pub fn for_version(version: SchemaVersion) -> &'static OptionSchema {
        match version {
            SchemaVersion::Flags => &*FLAGS,
            SchemaVersion::Macros => &*MACROS,
            SchemaVersion::DeviceChoice => &*DEVICE_CHOICE,
            SchemaVersion::DeviceToggles => &*DEVICE_TOGGLES,
            SchemaVersion::Mailbox => &*MAILBOX,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[CapabilityField] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&CapabilityField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Device backend toggles, in declaration order.
    pub fn device_toggles(&self) -> impl Iterator<Item = &CapabilityField> {
        self.fields.iter().filter(|f| {
            f.group() == FieldGroup::DeviceBackend && f.kind() == FieldKind::BooleanToggle
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    #[test]
    fn test_builtin_schemas_are_consistent() {
        for version in SchemaVersion::ALL {
            let schema = OptionSchema::for_version(version);
            assert_eq!(schema.version(), version);
            assert!(!schema.is_empty());
        }
    }

    #[test]
    fn test_for_version_is_shared() {
        let a = OptionSchema::for_version(SchemaVersion::Flags);
        let b = OptionSchema::for_version(SchemaVersion::Flags);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_field_sets_per_version() {
        let flags = OptionSchema::for_version(SchemaVersion::Flags);
        assert_eq!(flags.len(), 19);
        assert!(!flags.contains(names::ECAT_DEVICE));
        assert!(!flags.contains(names::HW_DEVICE_FILE));
        assert!(!flags.contains(names::MAX_COE_EMERGENCY_MSG_LEN));

        let choice = OptionSchema::for_version(SchemaVersion::DeviceChoice);
        assert!(choice.contains(names::ECAT_DEVICE));
        assert_eq!(choice.device_toggles().count(), 0);

        let mailbox = OptionSchema::for_version(SchemaVersion::Mailbox);
        assert_eq!(mailbox.len(), 28);
        assert_eq!(mailbox.device_toggles().count(), 5);
        assert!(mailbox.contains(names::MBX_SUPPORT_SOE));
        assert!(mailbox.contains(names::MAX_COE_EMERGENCY_MSG_LEN));
    }

    #[test]
    fn test_declaration_order() {
        let schema = OptionSchema::for_version(SchemaVersion::Mailbox);
        let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names[0], "shared");
        assert_eq!(names[1], "hw_device_file");
        assert_eq!(names[6], "mbx_support_eoe");
        assert_eq!(names[9], "max_slaves");
        assert_eq!(names.last(), Some(&"max_coe_emergency_msg_len"));
    }

    #[test]
    fn test_defaults() {
        let schema = OptionSchema::for_version(SchemaVersion::Mailbox);
        let default = |name: &str| schema.field(name).unwrap().default_value().clone();
        assert_eq!(default("max_slaves"), FieldValue::Int(256));
        assert_eq!(default("max_pdlen"), FieldValue::Int(3036));
        assert_eq!(default("hw_device_bpf"), FieldValue::Bool(false));
        assert_eq!(default("mbx_support_foe"), FieldValue::Bool(true));
    }

    #[test]
    fn test_every_backend_has_a_toggle() {
        let toggles = OptionSchema::for_version(SchemaVersion::DeviceToggles);
        for backend in DEVICE_BACKENDS {
            let toggle = device_toggle_for(backend).unwrap();
            assert!(toggles.contains(toggle), "{}", toggle);
        }
        assert_eq!(device_toggle_for("usb"), None);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = OptionSchema::new(
            SchemaVersion::Flags,
            vec![
                CapabilityField::limit("max_slaves", 1, ""),
                CapabilityField::limit("max_slaves", 2, ""),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                field: "max_slaves",
                version: SchemaVersion::Flags
            }
        );
    }

    #[test]
    fn test_invalid_default_rejected() {
        let err = OptionSchema::new(
            SchemaVersion::Flags,
            vec![CapabilityField::limit("max_slaves", 0, "")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { field: "max_slaves", .. }));
    }
}
