//! Boundary commands

use crate::cli_types::{BoundaryCommands, InitDatabaseArgs};
use crate::config::Settings;
use crate::provision::boundary;
use crate::scripts::EmbeddedScripts;
use crate::version::CheckpointClient;
use anyhow::Result;

/// Handle `boundary <command>`
pub fn handle_boundary(command: BoundaryCommands) -> Result<()> {
    match command {
        BoundaryCommands::InitDatabase(args) => handle_init_database(&args),
    }
}

/// Handle `boundary init-database`
pub fn handle_init_database(args: &InitDatabaseArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let target = args.target.to_target();
    let options = args.to_options();
    let versions = CheckpointClient::from_settings(&settings);

    if target.local {
        println!("Target: localhost");
    } else if let Some(addr) = &target.addr {
        println!("Target: {}@{} (remote)", target.user, addr);
    }

    boundary::init_database(&target, &settings, &options, &versions, &EmbeddedScripts)?;
    Ok(())
}
