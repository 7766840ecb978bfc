//! Build artifacts and the build mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of build-tool input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BuildArtifact {
    /// A configure command-line token, e.g. `--with-max-slaves=256`
    ConfigureFlag {
        name: String,
        value: Option<String>,
    },
    /// A preprocessor definition, e.g. `LEC_MAX_SLAVES=256`
    PreprocessorMacro { name: String, value: String },
}

impl BuildArtifact {
    /// A bare configure flag.
    pub fn flag(name: impl Into<String>) -> Self {
        BuildArtifact::ConfigureFlag {
            name: name.into(),
            value: None,
        }
    }

    /// A configure flag with an attached value.
    pub fn flag_with(name: impl Into<String>, value: impl fmt::Display) -> Self {
        BuildArtifact::ConfigureFlag {
            name: name.into(),
            value: Some(value.to_string()),
        }
    }

    /// A preprocessor macro.
    pub fn define(name: impl Into<String>, value: impl fmt::Display) -> Self {
        BuildArtifact::PreprocessorMacro {
            name: name.into(),
            value: value.to_string(),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, BuildArtifact::ConfigureFlag { .. })
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, BuildArtifact::PreprocessorMacro { .. })
    }

    /// Compiler form of a macro (`-DNAME=value`); `None` for flags.
    pub fn to_define_flag(&self) -> Option<String> {
        match self {
            BuildArtifact::PreprocessorMacro { name, value } => {
                Some(format!("-D{}={}", name, value))
            }
            BuildArtifact::ConfigureFlag { .. } => None,
        }
    }
}

impl fmt::Display for BuildArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildArtifact::ConfigureFlag { name, value: None } => write!(f, "{}", name),
            BuildArtifact::ConfigureFlag {
                name,
                value: Some(value),
            } => write!(f, "{}={}", name, value),
            BuildArtifact::PreprocessorMacro { name, value } => write!(f, "{}={}", name, value),
        }
    }
}

/// Debug or release build, external to the option schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Assertions on, no optimization, debug symbols
    #[default]
    Debug,
    /// Assertions off, optimized for speed
    Release,
}

impl BuildMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildMode::Debug),
            "release" => Ok(BuildMode::Release),
            _ => Err(format!(
                "invalid build mode '{}'; expected 'debug' or 'release'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_display() {
        assert_eq!(BuildArtifact::flag("--enable-shared").to_string(), "--enable-shared");
        assert_eq!(
            BuildArtifact::flag_with("--with-max-slaves", 256).to_string(),
            "--with-max-slaves=256"
        );
        assert_eq!(
            BuildArtifact::define("LEC_MAX_SLAVES", 256).to_string(),
            "LEC_MAX_SLAVES=256"
        );
    }

    #[test]
    fn test_define_flag() {
        let m = BuildArtifact::define("LEC_MAX_GROUPS", 8);
        assert!(m.is_macro());
        assert_eq!(m.to_define_flag().as_deref(), Some("-DLEC_MAX_GROUPS=8"));
        assert_eq!(BuildArtifact::flag("--enable-debug").to_define_flag(), None);
    }

    #[test]
    fn test_artifact_json_shape() {
        let json = serde_json::to_value(BuildArtifact::define("LEC_MAX_DATA", 4096)).unwrap();
        assert_eq!(json["kind"], "preprocessor-macro");
        assert_eq!(json["name"], "LEC_MAX_DATA");
        assert_eq!(json["value"], "4096");
    }

    #[test]
    fn test_build_mode_parse() {
        assert_eq!("Release".parse::<BuildMode>().unwrap(), BuildMode::Release);
        assert!("fast".parse::<BuildMode>().is_err());
        assert_eq!(BuildMode::default(), BuildMode::Debug);
    }
}
