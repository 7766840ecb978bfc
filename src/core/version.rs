//! Schema versions.
//!
//! Each historical generation of the libethercat recipe recognizes a
//! different set of capability fields and encodes them differently. All of
//! them stay selectable; none is treated as the "latest" intent.

use serde::{Deserialize, Serialize};

/// A named translation strategy plus the field set it recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaVersion {
    /// Every capability is a `--with-*`/`--enable-*` configure flag
    Flags,
    /// Limits become `LEC_*` preprocessor macros
    Macros,
    /// Flags, with the device backend as a single choice
    DeviceChoice,
    /// Flags, with one toggle per device backend
    DeviceToggles,
    /// Device toggles plus mailbox protocol toggles
    #[default]
    Mailbox,
}

impl SchemaVersion {
    /// Every version, oldest first.
    pub const ALL: [SchemaVersion; 5] = [
        SchemaVersion::Flags,
        SchemaVersion::Macros,
        SchemaVersion::DeviceChoice,
        SchemaVersion::DeviceToggles,
        SchemaVersion::Mailbox,
    ];

    /// Get the version identifier as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Flags => "flags",
            SchemaVersion::Macros => "macros",
            SchemaVersion::DeviceChoice => "device-choice",
            SchemaVersion::DeviceToggles => "device-toggles",
            SchemaVersion::Mailbox => "mailbox",
        }
    }

    /// One-line summary for `lecfg versions`.
    pub fn description(&self) -> &'static str {
        match self {
            SchemaVersion::Flags => "limits and linkage as configure flags",
            SchemaVersion::Macros => "limits as LEC_* preprocessor macros, toggles as flags",
            SchemaVersion::DeviceChoice => "configure flags with a single device backend choice",
            SchemaVersion::DeviceToggles => "configure flags with per-backend device toggles",
            SchemaVersion::Mailbox => "device toggles plus mailbox protocol toggles",
        }
    }

    /// Whether limits are encoded as preprocessor macros.
    pub fn is_macro_based(&self) -> bool {
        matches!(self, SchemaVersion::Macros)
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = SchemaVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flags" => Ok(SchemaVersion::Flags),
            "macros" => Ok(SchemaVersion::Macros),
            "device-choice" | "device_choice" => Ok(SchemaVersion::DeviceChoice),
            "device-toggles" | "device_toggles" => Ok(SchemaVersion::DeviceToggles),
            "mailbox" => Ok(SchemaVersion::Mailbox),
            _ => Err(SchemaVersionParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid schema version identifier.
#[derive(Debug, Clone)]
pub struct SchemaVersionParseError(pub String);

impl std::fmt::Display for SchemaVersionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid schema version '{}', valid values: flags, macros, device-choice, device-toggles, mailbox",
            self.0
        )
    }
}

impl std::error::Error for SchemaVersionParseError {}
