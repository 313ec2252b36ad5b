// CLI types for the hashiup binary (used by both library and binary)

use crate::config::BoundaryConfig;
use crate::provision::boundary::InitDatabaseOptions;
use crate::target::{DEFAULT_SSH_PORT, DEFAULT_SSH_USER, Target};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "hashiup")]
#[command(about = "Install and initialize HashiCorp products on local or remote hosts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase diagnostic output on stderr (repeatable)
    #[arg(long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage HashiCorp Boundary
    Boundary {
        #[command(subcommand)]
        command: BoundaryCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoundaryCommands {
    /// Initialize the Boundary database on a target
    InitDatabase(InitDatabaseArgs),
}

/// Where to run and how to authenticate
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Run on this machine instead of over SSH
    #[arg(long)]
    pub local: bool,

    /// Remote SSH target address (host or host:port)
    #[arg(long, env = "HASHIUP_SSH_TARGET_ADDR")]
    pub ssh_target_addr: Option<String>,

    /// Remote SSH port, used when the address carries none
    #[arg(long, env = "HASHIUP_SSH_TARGET_PORT", default_value_t = DEFAULT_SSH_PORT)]
    pub ssh_target_port: u16,

    /// Username for SSH login
    #[arg(long, env = "HASHIUP_SSH_TARGET_USER", default_value = DEFAULT_SSH_USER)]
    pub ssh_target_user: String,

    /// Password for SSH login
    #[arg(long, env = "HASHIUP_SSH_TARGET_PASSWORD", hide_env_values = true)]
    pub ssh_target_password: Option<String>,

    /// Private key for SSH login
    #[arg(long, env = "HASHIUP_SSH_TARGET_KEY")]
    pub ssh_target_key: Option<PathBuf>,

    /// Passphrase of the private key
    #[arg(long, env = "HASHIUP_SSH_TARGET_KEY_PASSPHRASE", hide_env_values = true)]
    pub ssh_target_key_passphrase: Option<String>,

    /// Authenticate with the running ssh-agent
    #[arg(long)]
    pub ssh_target_agent: bool,

    /// Seconds to wait while connecting and authenticating
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub ssh_target_timeout: u64,
}

impl TargetArgs {
    pub fn to_target(&self) -> Target {
        Target {
            local: self.local,
            addr: self.ssh_target_addr.clone(),
            port: self.ssh_target_port,
            user: self.ssh_target_user.clone(),
            password: self.ssh_target_password.clone(),
            key: self.ssh_target_key.clone(),
            key_passphrase: self.ssh_target_key_passphrase.clone(),
            agent: self.ssh_target_agent,
            timeout: Duration::from_secs(self.ssh_target_timeout),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InitDatabaseArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Upload and use this Boundary package instead of downloading
    #[arg(long)]
    pub package: Option<PathBuf>,

    /// Version of Boundary to install
    #[arg(long, short = 'v')]
    pub version: Option<String>,

    /// Custom Boundary configuration file to upload
    #[arg(long, short = 'c')]
    pub config_file: Option<PathBuf>,

    /// Boundary: configures the URL for connecting to Postgres
    #[arg(long)]
    pub db_url: Option<String>,

    /// Boundary: a KEK (Key Encrypting Key) for the scope-specific KEKs (the scope's root key)
    #[arg(long)]
    pub root_key: Option<String>,
}

impl InitDatabaseArgs {
    pub fn to_options(&self) -> InitDatabaseOptions {
        InitDatabaseOptions {
            package: self.package.clone(),
            version: self.version.clone(),
            config_file: self.config_file.clone(),
            config: BoundaryConfig {
                database_url: self.db_url.clone(),
                root_key: self.root_key.clone(),
            },
        }
    }
}
