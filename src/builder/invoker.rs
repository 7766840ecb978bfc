//! Hand-off to the native toolchain.
//!
//! The resolver never compiles anything itself. [`ConfigureCommand`] turns an
//! artifact list into the argument list of an autotools `configure` script,
//! and a [`BuildInvoker`] decides what to do with it.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::artifact::BuildArtifact;
use crate::util::process::{find_executable, find_make, shell_quote, ProcessBuilder};

/// Arguments for `configure`, in artifact order.
///
/// Configure flags keep their position. Preprocessor macros are collected
/// into a single trailing `CPPFLAGS=-D...` argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigureCommand {
    args: Vec<String>,
}

impl ConfigureCommand {
    pub fn from_artifacts(artifacts: &[BuildArtifact]) -> Self {
        let mut args = Vec::with_capacity(artifacts.len());
        let mut defines = Vec::new();

        for artifact in artifacts {
            match artifact.to_define_flag() {
                Some(define) => defines.push(define),
                None => args.push(artifact.to_string()),
            }
        }

        if !defines.is_empty() {
            args.push(format!("CPPFLAGS={}", defines.join(" ")));
        }

        ConfigureCommand { args }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The arguments joined into one shell-safe line.
    pub fn to_shell_line(&self) -> String {
        self.args
            .iter()
            .map(|a| shell_quote(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// External collaborator that consumes configure arguments.
pub trait BuildInvoker {
    /// Configure and build the native library in `source_dir`.
    fn invoke(&self, source_dir: &Path, command: &ConfigureCommand) -> Result<()>;
}

/// Drives `autoreconf`, `configure` and `make` for an autotools source tree.
#[derive(Debug, Clone, Default)]
pub struct AutotoolsInvoker {
    dry_run: bool,
    jobs: Option<usize>,
}

impl AutotoolsInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the planned commands instead of running them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Parallel jobs for `make`.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// The processes `invoke` runs, in order.
    pub fn plan(&self, source_dir: &Path, command: &ConfigureCommand) -> Vec<ProcessBuilder> {
        let autoreconf = find_executable("autoreconf").unwrap_or_else(|| PathBuf::from("autoreconf"));
        let make = find_make().unwrap_or_else(|| PathBuf::from("make"));

        let mut make_cmd = ProcessBuilder::new(make).cwd(source_dir);
        if let Some(jobs) = self.jobs {
            make_cmd = make_cmd.arg(format!("-j{}", jobs));
        }

        vec![
            ProcessBuilder::new(autoreconf)
                .arg("--install")
                .cwd(source_dir),
            ProcessBuilder::new("./configure")
                .args(command.args())
                .cwd(source_dir),
            make_cmd,
        ]
    }
}

impl BuildInvoker for AutotoolsInvoker {
    fn invoke(&self, source_dir: &Path, command: &ConfigureCommand) -> Result<()> {
        if !source_dir.join("configure.ac").exists() && !source_dir.join("configure").exists() {
            bail!(
                "no autotools project in `{}`\n\
                 help: Point `lecfg configure` at a directory containing configure.ac",
                source_dir.display()
            );
        }

        for step in self.plan(source_dir, command) {
            if self.dry_run {
                println!("{}", step.display_command());
                continue;
            }

            tracing::info!("Running `{}`", step.display_command());
            step.exec_and_check()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configure_command_collects_macros() {
        let cmd = ConfigureCommand::from_artifacts(&[
            BuildArtifact::flag("--disable-assert"),
            BuildArtifact::define("LEC_MAX_SLAVES", 64),
            BuildArtifact::flag("--enable-shared"),
            BuildArtifact::define("LEC_MAX_GROUPS", 2),
        ]);

        assert_eq!(
            cmd.args(),
            &[
                "--disable-assert",
                "--enable-shared",
                "CPPFLAGS=-DLEC_MAX_SLAVES=64 -DLEC_MAX_GROUPS=2",
            ]
        );
    }

    #[test]
    fn test_configure_command_without_macros() {
        let cmd = ConfigureCommand::from_artifacts(&[
            BuildArtifact::flag("--enable-debug"),
            BuildArtifact::flag_with("CFLAGS", "-O0 -g"),
        ]);

        assert_eq!(cmd.args().len(), 2);
        assert_eq!(cmd.to_shell_line(), "--enable-debug 'CFLAGS=-O0 -g'");
    }

    #[test]
    fn test_plan_order() {
        let tmp = TempDir::new().unwrap();
        let cmd = ConfigureCommand::from_artifacts(&[BuildArtifact::flag("--enable-debug")]);
        let plan = AutotoolsInvoker::new().jobs(Some(4)).plan(tmp.path(), &cmd);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].get_args(), &["--install"]);
        assert_eq!(plan[1].get_program(), Path::new("./configure"));
        assert_eq!(plan[1].get_args(), &["--enable-debug"]);
        assert_eq!(plan[2].get_args(), &["-j4"]);
        assert!(plan.iter().all(|p| p.get_cwd() == Some(tmp.path())));
    }

    #[test]
    fn test_invoke_requires_autotools_project() {
        let tmp = TempDir::new().unwrap();
        let err = AutotoolsInvoker::new()
            .dry_run(true)
            .invoke(tmp.path(), &ConfigureCommand::default())
            .unwrap_err();
        assert!(err.to_string().contains("no autotools project"));
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("configure.ac"), "AC_INIT([libethercat], [0.1])\n").unwrap();

        AutotoolsInvoker::new()
            .dry_run(true)
            .invoke(tmp.path(), &ConfigureCommand::default())
            .unwrap();
    }
}
