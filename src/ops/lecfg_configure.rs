//! Implementation of `lecfg configure`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::builder::invoker::BuildInvoker;
use crate::ops::lecfg_resolve::Resolution;

/// Hand a resolution to a build invoker.
pub fn configure(
    resolution: &Resolution,
    source_dir: &Path,
    invoker: &dyn BuildInvoker,
) -> Result<()> {
    let command = resolution.configure_command();

    tracing::info!(
        "Configuring libethercat in {} ({} schema, {})",
        source_dir.display(),
        resolution.schema,
        resolution.mode
    );

    invoker
        .invoke(source_dir, &command)
        .with_context(|| format!("failed to build libethercat in {}", source_dir.display()))
}
