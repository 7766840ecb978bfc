//! Implementation of `lecfg resolve`.
//!
//! Data flow: profile + CLI overrides -> [`BuildRequest`] -> platform policy
//! -> validation -> translation -> [`Resolution`].

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::builder::invoker::ConfigureCommand;
use crate::builder::translate::{translate, TranslateError};
use crate::core::artifact::{BuildArtifact, BuildMode};
use crate::core::field::RawValue;
use crate::core::option_set::{ForcedValue, OptionSet};
use crate::core::schema::{names, OptionSchema, PIKEOS_BACKEND};
use crate::core::version::SchemaVersion;
use crate::resolver::{validate, ValidationError};
use crate::util::config::Config;
use crate::util::diagnostic::Diagnostic;

/// Target platform of the native build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    pub os: Option<String>,
    pub arch: Option<String>,
}

impl Platform {
    /// Whether the target runs PikeOS, which only supports its own device backend.
    pub fn is_pikeos(&self) -> bool {
        self.os
            .as_deref()
            .is_some_and(|os| os.eq_ignore_ascii_case("pikeos"))
    }

    /// `--host` flag for cross builds (`<arch>-<os>`), PikeOS only.
    pub fn host_flag(&self) -> Option<BuildArtifact> {
        match (&self.arch, &self.os) {
            (Some(arch), Some(os)) if self.is_pikeos() => {
                Some(BuildArtifact::flag_with("--host", format!("{}-{}", arch, os)))
            }
            _ => None,
        }
    }
}

/// Everything one resolution needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildRequest {
    pub version: SchemaVersion,
    pub mode: BuildMode,
    pub platform: Platform,
    pub overrides: BTreeMap<String, RawValue>,
}

impl BuildRequest {
    /// Build a request from a merged profile. Unset values take their defaults.
    pub fn from_config(config: Config) -> Self {
        BuildRequest {
            version: config.schema.unwrap_or_default(),
            mode: config.mode.unwrap_or_default(),
            platform: Platform {
                os: config.platform.os,
                arch: config.platform.arch,
            },
            overrides: config.options,
        }
    }

    /// Overrides after the platform policy has been applied.
    fn effective_overrides(&self, schema: &OptionSchema) -> BTreeMap<String, RawValue> {
        let mut overrides = self.overrides.clone();

        if self.platform.is_pikeos() {
            if schema.contains(names::HW_DEVICE_PIKEOS) {
                tracing::info!("PikeOS target: selecting the PikeOS device backend");
                overrides.insert(names::HW_DEVICE_PIKEOS.to_string(), RawValue::Bool(true));
            } else if schema.contains(names::ECAT_DEVICE) {
                tracing::info!("PikeOS target: selecting the PikeOS device backend");
                overrides.insert(
                    names::ECAT_DEVICE.to_string(),
                    RawValue::Str(PIKEOS_BACKEND.to_string()),
                );
            }
        }

        overrides
    }
}

/// Error from a full resolution.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Translate(#[from] TranslateError),
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Validation(e) => e.to_diagnostic(),
            ResolveError::Translate(e) => e.to_diagnostic(),
        }
    }
}

/// The outcome of a resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub schema: SchemaVersion,
    pub mode: BuildMode,
    #[serde(skip)]
    pub options: OptionSet,
    pub forced: Vec<ForcedValue>,
    pub artifacts: Vec<BuildArtifact>,
}

impl Resolution {
    /// Arguments for the `configure` script.
    pub fn configure_command(&self) -> ConfigureCommand {
        ConfigureCommand::from_artifacts(&self.artifacts)
    }
}

/// Resolve a request into build artifacts.
///
/// Validation errors abort before anything is translated.
pub fn resolve(request: &BuildRequest) -> Result<Resolution, ResolveError> {
    let schema = OptionSchema::for_version(request.version);
    let overrides = request.effective_overrides(schema);

    let options = validate(schema, &overrides)?;
    let mut artifacts = translate(request.version, &options, request.mode)?;

    if let Some(host) = request.platform.host_flag() {
        artifacts.push(host);
    }

    tracing::debug!(
        "resolved {} artifact(s) for schema `{}` ({})",
        artifacts.len(),
        request.version,
        request.mode
    );

    Ok(Resolution {
        schema: request.version,
        mode: request.mode,
        forced: options.forced().to_vec(),
        options,
        artifacts,
    })
}

/// Parse a `name=value` override from the command line.
pub fn parse_override(spec: &str) -> Result<(String, RawValue)> {
    let Some((name, value)) = spec.split_once('=') else {
        bail!("invalid override `{}`, expected `name=value`", spec);
    };

    let name = name.trim();
    if name.is_empty() {
        bail!("invalid override `{}`, option name is empty", spec);
    }

    Ok((name.to_string(), RawValue::Str(value.trim().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    fn request(version: SchemaVersion, pairs: &[(&str, RawValue)]) -> BuildRequest {
        BuildRequest {
            version,
            mode: BuildMode::Release,
            platform: Platform::default(),
            overrides: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_resolve_flags_scenario() {
        let res = resolve(&request(
            SchemaVersion::Flags,
            &[("max_slaves", "256".into()), ("shared", "true".into())],
        ))
        .unwrap();

        let tokens: Vec<String> = res.artifacts.iter().map(|a| a.to_string()).collect();
        assert_eq!(tokens[0], "--disable-assert");
        for expected in ["--enable-shared", "--disable-static", "--with-max-slaves=256"] {
            assert!(tokens.contains(&expected.to_string()), "{}", expected);
        }
    }

    #[test]
    fn test_unknown_field_produces_no_artifacts() {
        let err = resolve(&request(SchemaVersion::Macros, &[("bogus_option", RawValue::Int(1))]))
            .unwrap_err();
        match err {
            ResolveError::Validation(e) => assert_eq!(e.field(), "bogus_option"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_pikeos_platform_selects_pikeos_backend() {
        let mut req = request(SchemaVersion::Mailbox, &[("hw_device_pikeos", RawValue::Bool(false))]);
        req.platform = Platform {
            os: Some("pikeos".to_string()),
            arch: Some("x86_64".to_string()),
        };

        let res = resolve(&req).unwrap();

        assert_eq!(res.options.get("hw_device_pikeos"), Some(&FieldValue::Bool(true)));
        assert_eq!(res.options.get("hw_device_file"), Some(&FieldValue::Bool(false)));
        assert_eq!(res.forced.len(), 3);
        assert_eq!(
            res.artifacts.last(),
            Some(&BuildArtifact::flag_with("--host", "x86_64-pikeos"))
        );
    }

    #[test]
    fn test_pikeos_platform_with_device_choice() {
        let mut req = request(SchemaVersion::DeviceChoice, &[]);
        req.platform.os = Some("PikeOS".to_string());

        let res = resolve(&req).unwrap();

        assert_eq!(
            res.options.get("ecat_device"),
            Some(&FieldValue::Choice("pikeos".to_string()))
        );
        assert!(res
            .artifacts
            .contains(&BuildArtifact::flag_with("--enable-device", "pikeos")));
        // No arch, no --host
        assert!(!res.artifacts.iter().any(|a| a.to_string().starts_with("--host")));
    }

    #[test]
    fn test_linux_platform_is_untouched() {
        let mut req = request(SchemaVersion::DeviceToggles, &[]);
        req.platform = Platform {
            os: Some("linux".to_string()),
            arch: Some("x86_64".to_string()),
        };

        let res = resolve(&req).unwrap();
        assert!(res.forced.is_empty());
        assert_eq!(req.platform.host_flag(), None);
    }

    #[test]
    fn test_from_config_defaults() {
        let req = BuildRequest::from_config(Config::default());
        assert_eq!(req.version, SchemaVersion::Mailbox);
        assert_eq!(req.mode, BuildMode::Debug);
        assert!(req.overrides.is_empty());
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("max_slaves=512").unwrap(),
            ("max_slaves".to_string(), RawValue::Str("512".to_string()))
        );
        assert_eq!(
            parse_override("ecat_device = bpf").unwrap(),
            ("ecat_device".to_string(), RawValue::Str("bpf".to_string()))
        );
        assert!(parse_override("max_slaves").is_err());
        assert!(parse_override("=5").is_err());
    }
}
