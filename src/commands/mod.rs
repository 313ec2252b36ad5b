// Command module routing
//
// To add a new product:
// 1. Create a new file in this directory (e.g., `vault.rs`)
// 2. Add `pub mod vault;` below
// 3. Add the match arm in `handle_command` function

pub mod boundary;

use crate::cli_types::Commands;
use anyhow::Result;

/// Dispatch command to appropriate handler
pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Boundary { command } => boundary::handle_boundary(command)?,
    }
    Ok(())
}
