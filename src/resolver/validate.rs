//! Override validation: raw user overrides -> immutable option set.

use std::collections::BTreeMap;

use crate::core::field::{CapabilityField, FieldDomain, FieldGroup, FieldValue, RawValue};
use crate::core::option_set::{ForcedValue, OptionEntry, OptionSet};
use crate::core::schema::{names, OptionSchema, PIKEOS_BACKEND};
use crate::core::version::SchemaVersion;
use crate::resolver::errors::ValidationError;

/// Validate overrides against a schema and resolve every field.
///
/// Unknown keys are rejected before any value is coerced. Fields are then
/// resolved in declaration order, so the first failing field is reported.
/// Fields without an override take the schema default.
///
/// Selecting the PikeOS device backend (through `ecat_device` or
/// `hw_device_pikeos`) forces every other device backend toggle off. This is
/// a normalization, not an error; the changes are recorded on the result.
pub fn validate(
    schema: &OptionSchema,
    overrides: &BTreeMap<String, RawValue>,
) -> Result<OptionSet, ValidationError> {
    tracing::debug!(
        "validating {} override(s) against schema `{}`",
        overrides.len(),
        schema.version()
    );

    if let Some(unknown) = overrides.keys().find(|k| !schema.contains(k)) {
        return Err(unknown_option(schema, unknown));
    }

    let mut entries = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let value = match overrides.get(field.name()) {
            Some(raw) => coerce(field, raw)?,
            None => field.default_value().clone(),
        };
        entries.push(OptionEntry {
            field: field.clone(),
            value,
        });
    }

    let forced = apply_device_policy(&mut entries);

    Ok(OptionSet::new(schema.version(), entries, forced))
}

/// Most names offered for one unknown key.
const MAX_SUGGESTIONS: usize = 3;

fn unknown_option(schema: &OptionSchema, key: &str) -> ValidationError {
    let mut candidates: Vec<(usize, &str)> = schema
        .fields()
        .iter()
        .map(|f| f.name())
        .filter(|name| name.starts_with(key) || key.starts_with(name))
        .map(|name| (name.len().abs_diff(key.len()), name))
        .collect();
    candidates.sort();

    // Only the closest names by length are offered.
    let closest = candidates.first().map(|&(distance, _)| distance);
    let suggestions = candidates
        .iter()
        .take_while(|&&(distance, _)| Some(distance) == closest)
        .take(MAX_SUGGESTIONS)
        .map(|&(_, name)| name.to_string())
        .collect();

    let defined_in = SchemaVersion::ALL
        .into_iter()
        .filter(|v| OptionSchema::for_version(*v).contains(key))
        .collect();

    ValidationError::UnknownOption {
        field: key.to_string(),
        version: schema.version(),
        suggestions,
        defined_in,
    }
}

/// Coerce a raw override to the field's kind and check its constraint.
fn coerce(field: &CapabilityField, raw: &RawValue) -> Result<FieldValue, ValidationError> {
    let mismatch = || ValidationError::TypeMismatch {
        field: field.name().to_string(),
        expected: field.kind(),
        found: raw.type_name(),
        value: raw.to_string(),
    };

    match field.domain() {
        FieldDomain::Integer(range) => {
            let value = match raw {
                RawValue::Int(v) => *v,
                RawValue::Str(s) => s.trim().parse::<i64>().map_err(|_| mismatch())?,
                RawValue::Bool(_) => return Err(mismatch()),
            };
            if !range.contains(value) {
                return Err(ValidationError::Range {
                    field: field.name().to_string(),
                    value,
                    range: range.to_string(),
                });
            }
            Ok(FieldValue::Int(value))
        }

        FieldDomain::Toggle => {
            let value = match raw {
                RawValue::Bool(b) => *b,
                RawValue::Int(0) => false,
                RawValue::Int(1) => true,
                RawValue::Int(_) => return Err(mismatch()),
                RawValue::Str(s) => parse_bool(s).ok_or_else(mismatch)?,
            };
            Ok(FieldValue::Bool(value))
        }

        FieldDomain::Choice(values) => {
            let value = raw.to_string();
            if !values.contains(&value.as_str()) {
                return Err(ValidationError::InvalidChoice {
                    field: field.name().to_string(),
                    value,
                    allowed: values.iter().map(|v| v.to_string()).collect(),
                });
            }
            Ok(FieldValue::Choice(value))
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Force every non-PikeOS device toggle off when PikeOS is selected.
fn apply_device_policy(entries: &mut [OptionEntry]) -> Vec<ForcedValue> {
    let pikeos_selected = entries.iter().any(|e| match e.field.name() {
        names::ECAT_DEVICE => e.value.as_choice() == Some(PIKEOS_BACKEND),
        names::HW_DEVICE_PIKEOS => e.value.as_bool() == Some(true),
        _ => false,
    });

    if !pikeos_selected {
        return Vec::new();
    }

    let mut forced = Vec::new();
    for entry in entries.iter_mut() {
        if entry.field.group() != FieldGroup::DeviceBackend
            || entry.field.domain() != &FieldDomain::Toggle
        {
            continue;
        }

        let target = FieldValue::Bool(entry.field.name() == names::HW_DEVICE_PIKEOS);
        if entry.value != target {
            tracing::debug!(
                "PikeOS backend selected: forcing `{}` from {} to {}",
                entry.field.name(),
                entry.value,
                target
            );
            forced.push(ForcedValue {
                field: entry.field.name(),
                requested: entry.value.clone(),
                forced: target.clone(),
            });
            entry.value = target;
        }
    }

    forced
}
