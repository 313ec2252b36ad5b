//! Runtime settings that do not come from command-line flags.
//!
//! Values are read from the process environment, which `main` seeds from a
//! `.env` file in the working directory when one exists.

pub mod boundary;

use crate::error::{ProvisionError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub use boundary::BoundaryConfig;

pub const DEFAULT_CHECKPOINT_URL: &str = "https://checkpoint-api.hashicorp.com";
pub const DEFAULT_CHECKPOINT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the release version feed
    pub checkpoint_url: String,
    pub checkpoint_timeout: Duration,
    /// `SSH_AUTH_SOCK`, when an agent is running
    pub agent_socket: Option<String>,
    pub home: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let checkpoint_url = get("HASHIUP_CHECKPOINT_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_CHECKPOINT_URL.to_string());

        let checkpoint_timeout = match get("HASHIUP_CHECKPOINT_TIMEOUT") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ProvisionError::configuration(format!(
                        "HASHIUP_CHECKPOINT_TIMEOUT must be a number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_CHECKPOINT_TIMEOUT_SECS),
        };

        Ok(Self {
            checkpoint_url,
            checkpoint_timeout,
            agent_socket: get("SSH_AUTH_SOCK"),
            home: get("HOME").map(PathBuf::from),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            checkpoint_url: DEFAULT_CHECKPOINT_URL.to_string(),
            checkpoint_timeout: Duration::from_secs(DEFAULT_CHECKPOINT_TIMEOUT_SECS),
            agent_socket: None,
            home: None,
        }
    }
}
