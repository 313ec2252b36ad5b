// hashiup library
// Provisioning workflows that run unchanged against the local machine or a
// remote host over SSH

pub mod cli_types;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod provision;
pub mod scripts;
pub mod target;
pub mod utils;
pub mod version;

// Re-export commonly used items
pub use error::{ProvisionError, Result};
pub use target::Target;
pub use utils::exec::{CommandOperator, Executor};
