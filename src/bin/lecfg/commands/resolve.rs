//! `lecfg resolve` command

use anyhow::{bail, Result};

use super::{build_request, report_forced};
use crate::cli::ResolveArgs;
use lecfg::ops::resolve;

pub fn execute(args: ResolveArgs, color: bool) -> Result<()> {
    let request = build_request(&args.profile)?;
    let resolution = resolve(&request)?;
    report_forced(&resolution, color);

    match args.format.as_str() {
        "text" => {
            for artifact in &resolution.artifacts {
                println!("{}", artifact);
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&resolution)?),
        "shell" => println!("{}", resolution.configure_command().to_shell_line()),
        other => bail!("unknown format `{}`, expected `text`, `json` or `shell`", other),
    }

    Ok(())
}
