//! Test doubles for workflow tests

use crate::error::{ProvisionError, Result};
use crate::scripts::ScriptSource;
use crate::utils::exec::CommandOperator;
use crate::version::VersionResolver;
use std::cell::{Cell, RefCell};
use std::io::{Cursor, Read};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub path: String,
    pub mode: String,
    pub content: Vec<u8>,
}

/// Operator that records every call and can be told to fail
#[derive(Default)]
pub struct RecordingOperator {
    commands: RefCell<Vec<String>>,
    uploads: RefCell<Vec<RecordedUpload>>,
    fail_command: Option<String>,
    fail_upload: Option<String>,
}

impl RecordingOperator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any command starting with `prefix` with exit code 1
    pub fn fail_on_command(mut self, prefix: &str) -> Self {
        self.fail_command = Some(prefix.to_string());
        self
    }

    /// Fail any upload whose destination ends with `suffix`
    pub fn fail_on_upload(mut self, suffix: &str) -> Self {
        self.fail_upload = Some(suffix.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.borrow().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn upload_to(&self, suffix: &str) -> Option<RecordedUpload> {
        self.uploads
            .borrow()
            .iter()
            .find(|u| u.path.ends_with(suffix))
            .cloned()
    }
}

impl CommandOperator for RecordingOperator {
    fn execute(&self, command: &str) -> Result<String> {
        self.commands.borrow_mut().push(command.to_string());
        if let Some(prefix) = &self.fail_command {
            if command.starts_with(prefix.as_str()) {
                return Err(ProvisionError::Execution {
                    command: command.to_string(),
                    status: Some(1),
                    output: "permission denied".to_string(),
                });
            }
        }
        Ok(String::new())
    }

    fn upload(&self, content: &mut dyn Read, remote_path: &str, mode: &str) -> Result<()> {
        if let Some(suffix) = &self.fail_upload {
            if remote_path.ends_with(suffix.as_str()) {
                return Err(ProvisionError::transport(
                    &format!("sftp write {}", remote_path),
                    "no space left on device",
                ));
            }
        }
        let mut buf = Vec::new();
        content
            .read_to_end(&mut buf)
            .map_err(|e| ProvisionError::transport(remote_path, e))?;
        self.uploads.borrow_mut().push(RecordedUpload {
            path: remote_path.to_string(),
            mode: mode.to_string(),
            content: buf,
        });
        Ok(())
    }
}

/// Resolver returning a fixed answer and counting calls
pub struct FixedVersion {
    version: Option<String>,
    calls: Cell<usize>,
}

impl FixedVersion {
    pub fn ok(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            calls: Cell::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            version: None,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl VersionResolver for FixedVersion {
    fn latest_version(&self, _product: &str) -> anyhow::Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.version
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

/// In-memory scripts
#[derive(Default)]
pub struct MemoryScripts {
    scripts: Vec<(String, String)>,
}

impl MemoryScripts {
    pub fn with(name: &str, body: &str) -> Self {
        Self {
            scripts: vec![(name.to_string(), body.to_string())],
        }
    }
}

impl ScriptSource for MemoryScripts {
    fn open(&self, name: &str) -> Result<Box<dyn Read>> {
        self.scripts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| Box::new(Cursor::new(body.clone().into_bytes())) as Box<dyn Read>)
            .ok_or_else(|| ProvisionError::Asset(name.to_string()))
    }
}
