//! Validation error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::field::FieldKind;
use crate::core::version::SchemaVersion;
use crate::util::diagnostic::Diagnostic;

/// Error while validating option overrides against a schema.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ValidationError {
    #[error("unknown option `{field}` for schema `{version}`")]
    #[diagnostic(code(lecfg::validate::unknown_option))]
    UnknownOption {
        field: String,
        version: SchemaVersion,
        suggestions: Vec<String>,
        defined_in: Vec<SchemaVersion>,
    },

    #[error("value {value} for `{field}` is out of range ({range})")]
    #[diagnostic(code(lecfg::validate::range))]
    Range {
        field: String,
        value: i64,
        range: String,
    },

    #[error("invalid choice `{value}` for `{field}`")]
    #[diagnostic(code(lecfg::validate::invalid_choice))]
    InvalidChoice {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("`{field}` expects {expected}, found {found} `{value}`")]
    #[diagnostic(code(lecfg::validate::type_mismatch))]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: &'static str,
        value: String,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownOption { field, .. }
            | ValidationError::Range { field, .. }
            | ValidationError::InvalidChoice { field, .. }
            | ValidationError::TypeMismatch { field, .. } => field,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ValidationError::UnknownOption {
                field,
                version,
                suggestions,
                defined_in,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "unknown option `{}` for schema `{}`",
                    field, version
                ));

                if !suggestions.is_empty() {
                    diag = diag.with_context(format!(
                        "did you mean: {}?",
                        suggestions.join(", ")
                    ));
                }

                if !defined_in.is_empty() {
                    let versions: Vec<&str> = defined_in.iter().map(|v| v.as_str()).collect();
                    diag = diag.with_context(format!(
                        "`{}` is defined by schema: {}",
                        field,
                        versions.join(", ")
                    ));
                    diag = diag.with_suggestion(format!(
                        "Select a schema that defines it: `--schema {}`",
                        versions[versions.len() - 1]
                    ));
                }

                diag.with_suggestion(format!(
                    "Run `lecfg schema --schema {}` to list the recognized options",
                    version
                ))
            }

            ValidationError::Range {
                field,
                value,
                range,
            } => Diagnostic::error(format!("value {} for `{}` is out of range", value, field))
                .with_context(format!("`{}` must be {}", field, range))
                .with_suggestion(format!("Pass a value {} with `-o {}=<value>`", range, field)),

            ValidationError::InvalidChoice {
                field,
                value,
                allowed,
            } => Diagnostic::error(format!("invalid choice `{}` for `{}`", value, field))
                .with_context(format!("allowed values: {}", allowed.join(", ")))
                .with_suggestion(format!("Pick one of the allowed values for `{}`", field)),

            ValidationError::TypeMismatch {
                field,
                expected,
                found,
                value,
            } => Diagnostic::error(format!(
                "`{}` expects {}, found {} `{}`",
                field, expected, found, value
            ))
            .with_suggestion(match expected {
                FieldKind::IntegerBound => format!("Pass an integer, e.g. `-o {}=16`", field),
                FieldKind::BooleanToggle => format!("Pass `true` or `false` for `{}`", field),
                FieldKind::EnumeratedChoice => {
                    format!("Pass one of the names listed by `lecfg schema` for `{}`", field)
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_diagnostic() {
        let err = ValidationError::UnknownOption {
            field: "max_slave".to_string(),
            version: SchemaVersion::Flags,
            suggestions: vec!["max_slaves".to_string()],
            defined_in: vec![],
        };

        let output = err.to_diagnostic().format(false);

        assert!(output.contains("error: unknown option `max_slave`"));
        assert!(output.contains("did you mean: max_slaves?"));
        assert!(output.contains("lecfg schema --schema flags"));
    }

    #[test]
    fn test_unknown_option_names_defining_schema() {
        let err = ValidationError::UnknownOption {
            field: "mbx_support_eoe".to_string(),
            version: SchemaVersion::DeviceToggles,
            suggestions: vec![],
            defined_in: vec![SchemaVersion::Mailbox],
        };

        let output = err.to_diagnostic().format(false);

        assert!(output.contains("is defined by schema: mailbox"));
        assert!(output.contains("--schema mailbox"));
    }

    #[test]
    fn test_invalid_choice_diagnostic() {
        let err = ValidationError::InvalidChoice {
            field: "ecat_device".to_string(),
            value: "usb".to_string(),
            allowed: vec!["file".to_string(), "bpf".to_string()],
        };

        let output = err.to_diagnostic().format(false);

        assert!(output.contains("invalid choice `usb` for `ecat_device`"));
        assert!(output.contains("allowed values: file, bpf"));
    }

    #[test]
    fn test_range_error_message() {
        let err = ValidationError::Range {
            field: "max_groups".to_string(),
            value: -1,
            range: ">= 1".to_string(),
        };

        assert_eq!(err.to_string(), "value -1 for `max_groups` is out of range (>= 1)");
        assert_eq!(err.field(), "max_groups");
    }
}
