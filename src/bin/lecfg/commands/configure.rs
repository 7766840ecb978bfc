//! `lecfg configure` command

use anyhow::{Context, Result};

use super::{build_request, report_forced};
use crate::cli::ConfigureArgs;
use lecfg::builder::AutotoolsInvoker;
use lecfg::ops::{configure, resolve};

pub fn execute(args: ConfigureArgs, color: bool) -> Result<()> {
    let source_dir = args
        .source_dir
        .canonicalize()
        .with_context(|| format!("source directory not found: {}", args.source_dir.display()))?;

    let request = build_request(&args.profile)?;
    let resolution = resolve(&request)?;
    report_forced(&resolution, color);

    let invoker = AutotoolsInvoker::new()
        .dry_run(args.dry_run)
        .jobs(args.jobs);

    configure(&resolution, &source_dir, &invoker)?;

    if !args.dry_run {
        tracing::info!("Finished libethercat build in {}", source_dir.display());
    }

    Ok(())
}
