//! Target resolution: where a workflow runs and how to reach it

use crate::config::Settings;
use crate::error::{ProvisionError, Result};
use crate::utils::exec::{CommandOperator, Executor};
use crate::utils::ssh::{AuthMethod, SshConnection};
use crate::utils::string::expand_path;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_SSH_USER: &str = "root";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to provision and with which credentials. Built once per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub local: bool,
    pub addr: Option<String>,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub key: Option<PathBuf>,
    pub key_passphrase: Option<String>,
    pub agent: bool,
    /// Connection-establishment timeout
    pub timeout: Duration,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            local: false,
            addr: None,
            port: DEFAULT_SSH_PORT,
            user: DEFAULT_SSH_USER.to_string(),
            password: None,
            key: None,
            key_passphrase: None,
            agent: false,
            timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl Target {
    pub fn local() -> Self {
        Self {
            local: true,
            ..Self::default()
        }
    }

    pub fn remote(addr: &str) -> Self {
        Self {
            addr: Some(addr.to_string()),
            ..Self::default()
        }
    }

    /// Fail fast when there is nowhere to run
    pub fn validate(&self) -> Result<()> {
        if !self.local && self.addr.as_deref().is_none_or(|a| a.trim().is_empty()) {
            return Err(ProvisionError::configuration(
                "required ssh-target-addr flag is missing",
            ));
        }
        if !self.local && self.timeout.is_zero() {
            return Err(ProvisionError::configuration(
                "ssh-target-timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Host and port, honouring a port embedded in the address
    pub fn endpoint(&self) -> Result<(String, u16)> {
        let addr = self.addr.as_deref().map(str::trim).unwrap_or_default();
        if addr.is_empty() {
            return Err(ProvisionError::configuration(
                "required ssh-target-addr flag is missing",
            ));
        }
        split_host_port(addr, self.port)
    }

    /// Pick the authentication method for a remote target.
    ///
    /// Explicit key, then explicit password, then the agent, then the
    /// default `~/.ssh/id_rsa`.
    pub fn resolve_auth(&self, settings: &Settings) -> Result<AuthMethod> {
        let home = settings.home.as_deref();

        if let Some(key) = &self.key {
            return Ok(AuthMethod::Key {
                path: expand_path(key, home),
                passphrase: self.key_passphrase.clone(),
            });
        }

        if let Some(password) = &self.password {
            return Ok(AuthMethod::Password(password.clone()));
        }

        if self.agent {
            if settings.agent_socket.is_none() {
                return Err(ProvisionError::configuration(
                    "--ssh-target-agent was given but no ssh-agent is available (SSH_AUTH_SOCK is not set)",
                ));
            }
            return Ok(AuthMethod::Agent);
        }

        if settings.agent_socket.is_some() {
            return Ok(AuthMethod::Agent);
        }

        if let Some(home) = home {
            let default_key = home.join(".ssh").join("id_rsa");
            if default_key.is_file() {
                return Ok(AuthMethod::Key {
                    path: default_key,
                    passphrase: self.key_passphrase.clone(),
                });
            }
        }

        Err(ProvisionError::configuration(
            "no SSH credentials available: use --ssh-target-password, --ssh-target-key or --ssh-target-agent",
        ))
    }

    /// Resolve into a ready-to-use executor
    pub fn connect(&self, settings: &Settings) -> Result<Executor> {
        self.validate()?;
        if self.local {
            return Ok(Executor::Local);
        }

        let (host, port) = self.endpoint()?;
        let auth = self.resolve_auth(settings)?;
        let conn = SshConnection::connect(&host, port, &self.user, &auth, self.timeout)?;
        Ok(Executor::Remote(conn))
    }

    /// Run `callback` against this target. The connection lives only for
    /// the duration of the call and is released before returning.
    pub fn execute<T, F>(&self, settings: &Settings, callback: F) -> Result<T>
    where
        F: FnOnce(&dyn CommandOperator) -> Result<T>,
    {
        let executor = self.connect(settings)?;
        let result = callback(&executor);
        drop(executor);
        result
    }
}

fn split_host_port(addr: &str, default_port: u16) -> Result<(String, u16)> {
    let invalid_port = |port: &str| {
        ProvisionError::configuration(format!("invalid port '{}' in ssh-target-addr", port))
    };

    // [v6]:port or [v6]
    if let Some(rest) = addr.strip_prefix('[') {
        let Some((host, tail)) = rest.split_once(']') else {
            return Err(ProvisionError::configuration(format!(
                "invalid ssh-target-addr '{}'",
                addr
            )));
        };
        return match tail.strip_prefix(':') {
            Some(port) => Ok((host.to_string(), port.parse().map_err(|_| invalid_port(port))?)),
            None if tail.is_empty() => Ok((host.to_string(), default_port)),
            None => Err(ProvisionError::configuration(format!(
                "invalid ssh-target-addr '{}'",
                addr
            ))),
        };
    }

    // Bare IPv6 addresses contain several colons and carry no port
    match addr.split_once(':') {
        Some((host, port)) if !port.contains(':') => {
            Ok((host.to_string(), port.parse().map_err(|_| invalid_port(port))?))
        }
        _ => Ok((addr.to_string(), default_port)),
    }
}
