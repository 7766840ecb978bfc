//! Test utilities and mocks for lecfg unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::invoker::{BuildInvoker, ConfigureCommand};

/// Build invoker that records every call instead of spawning processes.
#[derive(Debug, Default)]
pub struct RecordingInvoker {
    calls: Mutex<Vec<(PathBuf, ConfigureCommand)>>,
    failure: Option<String>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// An invoker whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        RecordingInvoker {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<(PathBuf, ConfigureCommand)> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildInvoker for RecordingInvoker {
    fn invoke(&self, source_dir: &Path, command: &ConfigureCommand) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((source_dir.to_path_buf(), command.clone()));

        if let Some(ref message) = self.failure {
            bail!("{}", message);
        }
        Ok(())
    }
}
