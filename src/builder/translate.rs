//! Artifact translation: option set -> ordered build artifacts.
//!
//! Every (version, kind, group) combination has an entry in [`encoding`]:
//! either an encoding rule, a documented skip, or `None`. `None` means the
//! combination has no meaning for that version and surfaces as
//! [`TranslateError::UnsupportedFieldForVersion`].

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::artifact::{BuildArtifact, BuildMode};
use crate::core::field::{CapabilityField, FieldGroup, FieldKind, FieldValue};
use crate::core::option_set::OptionSet;
use crate::core::schema::device_toggle_for;
use crate::core::version::SchemaVersion;
use crate::util::diagnostic::Diagnostic;

/// Configure flag appended after every field artifact.
pub const SILENT_RULES_FLAG: &str = "--disable-silent-rules";

/// Translation error: an option set translated under a version it was not validated for.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum TranslateError {
    #[error("schema `{version}` has no encoding for {kind} field `{field}`")]
    #[diagnostic(code(lecfg::translate::unsupported_field))]
    UnsupportedFieldForVersion {
        field: String,
        kind: FieldKind,
        version: SchemaVersion,
    },
}

impl TranslateError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TranslateError::UnsupportedFieldForVersion {
                field,
                kind,
                version,
            } => Diagnostic::error(format!(
                "schema `{}` has no encoding for {} field `{}`",
                version, kind, field
            ))
            .with_context("the option set was validated against a different schema version")
            .with_suggestion(format!(
                "Validate and translate with the same schema, or drop `{}`",
                field
            )),
        }
    }
}

/// How one field is turned into artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `--with-<kebab>=<value>`
    WithValue,
    /// `LEC_<UPPER_SNAKE>=<value>`
    Macro,
    /// `--enable-<kebab> --disable-static` or the inverse pair
    LinkagePair,
    /// `--enable-device-<backend>` when true, nothing when false
    EnableIfTrue,
    /// `--disable-<kebab>` when false, nothing when true
    DisableIfFalse,
    /// `--enable-device=<value>`
    DeviceValue,
    /// `--enable-device-<backend>` for the chosen backend
    DeviceFlag,
    /// No artifact; a documented limitation of the version
    Skip,
}

/// Look up the encoding rule for a field kind and group under a version.
pub fn encoding(version: SchemaVersion, kind: FieldKind, group: FieldGroup) -> Option<Encoding> {
    use SchemaVersion::*;

    match (kind, group) {
        (FieldKind::IntegerBound, FieldGroup::Limit) => match version {
            Macros => Some(Encoding::Macro),
            Flags | DeviceChoice | DeviceToggles | Mailbox => Some(Encoding::WithValue),
        },

        (FieldKind::BooleanToggle, FieldGroup::Linkage) => Some(Encoding::LinkagePair),

        (FieldKind::BooleanToggle, FieldGroup::DeviceBackend) => match version {
            Macros => Some(Encoding::Skip),
            DeviceToggles | Mailbox => Some(Encoding::EnableIfTrue),
            Flags | DeviceChoice => None,
        },

        (FieldKind::BooleanToggle, FieldGroup::MailboxProtocol) => match version {
            Macros => Some(Encoding::Skip),
            Mailbox => Some(Encoding::DisableIfFalse),
            Flags | DeviceChoice | DeviceToggles => None,
        },

        (FieldKind::EnumeratedChoice, FieldGroup::DeviceBackend) => match version {
            Macros => Some(Encoding::Skip),
            DeviceChoice => Some(Encoding::DeviceValue),
            DeviceToggles | Mailbox => Some(Encoding::DeviceFlag),
            Flags => None,
        },

        (FieldKind::IntegerBound, _)
        | (FieldKind::BooleanToggle, FieldGroup::Limit)
        | (FieldKind::EnumeratedChoice, _) => None,
    }
}

/// Artifacts for the build mode. Always first in a translation.
pub fn build_mode_artifacts(mode: BuildMode) -> Vec<BuildArtifact> {
    match mode {
        BuildMode::Debug => vec![
            BuildArtifact::flag("--enable-assert"),
            BuildArtifact::flag("--enable-debug"),
            BuildArtifact::flag_with("CFLAGS", "-O0 -g"),
        ],
        BuildMode::Release => vec![
            BuildArtifact::flag("--disable-assert"),
            BuildArtifact::flag_with("CFLAGS", "-O2"),
        ],
    }
}

/// Translate an option set into build artifacts for a schema version.
///
/// The result starts with the build-mode artifacts, continues with one group
/// of artifacts per field in declaration order and ends with
/// [`SILENT_RULES_FLAG`]. The same inputs always give the same list.
pub fn translate(
    version: SchemaVersion,
    options: &OptionSet,
    mode: BuildMode,
) -> Result<Vec<BuildArtifact>, TranslateError> {
    let mut artifacts = build_mode_artifacts(mode);

    for entry in options.entries() {
        let field = &entry.field;
        let rule = encoding(version, field.kind(), field.group()).ok_or_else(|| {
            TranslateError::UnsupportedFieldForVersion {
                field: field.name().to_string(),
                kind: field.kind(),
                version,
            }
        })?;

        if rule == Encoding::Skip {
            tracing::debug!(
                "schema `{}` has no encoding for `{}`, skipping",
                version,
                field.name()
            );
            continue;
        }

        encode(rule, field, &entry.value, &mut artifacts);
    }

    artifacts.push(BuildArtifact::flag(SILENT_RULES_FLAG));

    tracing::debug!(
        "translated {} field(s) into {} artifact(s) for schema `{}`",
        options.entries().len(),
        artifacts.len(),
        version
    );

    Ok(artifacts)
}

/// Artifacts for one resolved field.
///
/// Validated values always match their field kind. Pairs without an arm
/// (a false toggle under `EnableIfTrue`, a skipped field) emit nothing.
fn encode(rule: Encoding, field: &CapabilityField, value: &FieldValue, out: &mut Vec<BuildArtifact>) {
    match (rule, value) {
        (Encoding::WithValue, FieldValue::Int(v)) => {
            out.push(BuildArtifact::flag_with(
                format!("--with-{}", field.kebab_name()),
                v,
            ));
        }
        (Encoding::Macro, FieldValue::Int(v)) => {
            out.push(BuildArtifact::define(field.macro_name(), v));
        }
        (Encoding::LinkagePair, FieldValue::Bool(true)) => {
            out.push(BuildArtifact::flag(format!("--enable-{}", field.kebab_name())));
            out.push(BuildArtifact::flag("--disable-static"));
        }
        (Encoding::LinkagePair, FieldValue::Bool(false)) => {
            out.push(BuildArtifact::flag(format!("--disable-{}", field.kebab_name())));
            out.push(BuildArtifact::flag("--enable-static"));
        }
        (Encoding::EnableIfTrue, FieldValue::Bool(true)) => {
            out.push(BuildArtifact::flag(device_flag(field.name())));
        }
        (Encoding::DisableIfFalse, FieldValue::Bool(false)) => {
            out.push(BuildArtifact::flag(format!(
                "--disable-{}",
                field.kebab_name()
            )));
        }
        (Encoding::DeviceValue, FieldValue::Choice(v)) => {
            out.push(BuildArtifact::flag_with("--enable-device", v));
        }
        (Encoding::DeviceFlag, FieldValue::Choice(v)) => {
            if let Some(toggle) = device_toggle_for(v) {
                out.push(BuildArtifact::flag(device_flag(toggle)));
            }
        }
        _ => {}
    }
}

/// `hw_device_sock_raw` -> `--enable-device-sock-raw`.
fn device_flag(toggle: &str) -> String {
    let stem = toggle.strip_prefix("hw_").unwrap_or(toggle);
    format!("--enable-{}", stem.replace('_', "-"))
}
