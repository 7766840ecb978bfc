//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// lecfg - resolve libethercat capability options into configure flags and macros
#[derive(Parser)]
#[command(name = "lecfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve options into build artifacts
    Resolve(ResolveArgs),

    /// List the options of a schema version
    Schema(SchemaArgs),

    /// List the schema versions
    Versions,

    /// Resolve options and configure/build a libethercat source tree
    Configure(ConfigureArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that resolves a profile.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Schema version (flags, macros, device-choice, device-toggles, mailbox)
    #[arg(short, long, env = "LECFG_SCHEMA")]
    pub schema: Option<String>,

    /// Build in release mode
    #[arg(short, long)]
    pub release: bool,

    /// Target operating system (e.g. linux, pikeos)
    #[arg(long)]
    pub os: Option<String>,

    /// Target CPU architecture (e.g. x86_64)
    #[arg(long)]
    pub arch: Option<String>,

    /// Override an option, e.g. `-o max_slaves=512` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Profile file to use instead of the global and project config
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Output format (text, json, shell)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Schema version to describe
    #[arg(short, long, env = "LECFG_SCHEMA")]
    pub schema: Option<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// libethercat source directory
    pub source_dir: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Number of parallel make jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
