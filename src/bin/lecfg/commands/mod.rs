//! Command implementations

pub mod completions;
pub mod configure;
pub mod resolve;
pub mod schema;
pub mod versions;

use anyhow::{anyhow, Context, Result};

use crate::cli::ProfileArgs;
use lecfg::core::artifact::BuildMode;
use lecfg::core::version::SchemaVersion;
use lecfg::ops::{parse_override, BuildRequest, Resolution};
use lecfg::util::config::{global_config_path, load_config, project_config_path, Config};
use lecfg::util::diagnostic::{emit, suggestions, Diagnostic};

/// Parse a `--schema` argument.
pub fn parse_schema(schema: &str) -> Result<SchemaVersion> {
    schema
        .parse::<SchemaVersion>()
        .map_err(|e| anyhow!("{}\n{}", e, suggestions::LIST_VERSIONS))
}

/// Build a request from the profile files and the command line.
///
/// Command-line values win over `--config`, which replaces the global and
/// project profiles.
pub fn build_request(args: &ProfileArgs) -> Result<BuildRequest> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            let project = project_config_path(&cwd);
            match global_config_path() {
                Some(global) => load_config(&global, &project),
                None => Config::load_or_default(&project),
            }
        }
    };

    config.merge(cli_layer(args)?);
    tracing::debug!("effective profile: {:?}", config);

    Ok(BuildRequest::from_config(config))
}

fn cli_layer(args: &ProfileArgs) -> Result<Config> {
    let mut layer = Config::default();

    if let Some(schema) = &args.schema {
        layer.schema = Some(parse_schema(schema)?);
    }
    if args.release {
        layer.mode = Some(BuildMode::Release);
    }
    layer.platform.os = args.os.clone();
    layer.platform.arch = args.arch.clone();

    for spec in &args.options {
        let (name, value) = parse_override(spec)
            .map_err(|e| anyhow!("{}\n{}", e, suggestions::OVERRIDE_SYNTAX))?;
        layer.options.insert(name, value);
    }

    Ok(layer)
}

/// Print a note for every value the device policy changed.
pub fn report_forced(resolution: &Resolution, color: bool) {
    for forced in &resolution.forced {
        let note = Diagnostic::note(format!(
            "forced `{}` from {} to {}",
            forced.field, forced.requested, forced.forced
        ))
        .with_context("the PikeOS device backend excludes every other backend");
        emit(&note, color);
    }
}
