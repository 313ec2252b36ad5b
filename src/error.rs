//! Error taxonomy for provisioning workflows.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Bad or missing user input, detected before any network action
    #[error("{0}")]
    Configuration(String),

    #[error(
        "unable to get latest version number, define a version manually with the --version flag: {source:#}"
    )]
    VersionLookup {
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bundled script is missing from the binary (packaging defect)
    #[error("bundled script '{0}' is not available in this build")]
    Asset(String),

    #[error("error received during upload {artifact}: {source}")]
    Upload {
        artifact: String,
        #[source]
        source: Box<ProvisionError>,
    },

    /// Non-zero exit, or the transport failed while the command was running
    #[error("command '{command}' failed{}: {}", status_suffix(*status), output.trim())]
    Execution {
        command: String,
        status: Option<i32>,
        output: String,
    },

    #[error("unable to connect to {target}: {reason}")]
    Connection { target: String, reason: String },
}

fn status_suffix(status: Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

impl ProvisionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ProvisionError::Configuration(message.into())
    }

    /// Wrap an operator failure with the name of the artifact being uploaded
    pub fn upload(artifact: &str, source: ProvisionError) -> Self {
        ProvisionError::Upload {
            artifact: artifact.to_string(),
            source: Box::new(source),
        }
    }

    /// Transport failure while a command was in flight
    pub fn transport(command: &str, reason: impl std::fmt::Display) -> Self {
        ProvisionError::Execution {
            command: command.to_string(),
            status: None,
            output: reason.to_string(),
        }
    }

    pub fn connection(target: &str, reason: impl std::fmt::Display) -> Self {
        ProvisionError::Connection {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }
}
