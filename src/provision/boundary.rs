//! Boundary database initialization

use crate::config::{BoundaryConfig, Settings};
use crate::error::{ProvisionError, Result};
use crate::provision::workspace::Workspace;
use crate::scripts::{INSTALL_BOUNDARY_DB, ScriptSource};
use crate::target::Target;
use crate::utils::exec::CommandOperator;
use crate::utils::string::{expand_path, shell_escape};
use crate::version::VersionResolver;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const PRODUCT: &str = "boundary";
pub const WORKSPACE_PREFIX: &str = "hashiup";

const PACKAGE_PATH: &str = "boundary.zip";
const CONFIG_PATH: &str = "config/boundary.hcl";
const SCRIPT_PATH: &str = "install.sh";

/// Inputs for `boundary init-database`
#[derive(Debug, Clone, Default)]
pub struct InitDatabaseOptions {
    /// Local package to upload instead of downloading on the target
    pub package: Option<PathBuf>,
    pub version: Option<String>,
    /// Custom configuration file; takes precedence over generated config
    pub config_file: Option<PathBuf>,
    pub config: BoundaryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Generated(String),
    File(PathBuf),
}

/// Everything resolved before touching the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitDatabasePlan {
    pub package: Option<PathBuf>,
    /// Empty when a package is uploaded without an explicit version
    pub version: String,
    pub config: ConfigSource,
}

/// Validate inputs and resolve the version. Only the version feed may be
/// contacted here; the target is not.
pub fn plan(
    target: &Target,
    options: &InitDatabaseOptions,
    versions: &dyn VersionResolver,
    home: Option<&Path>,
) -> Result<InitDatabasePlan> {
    target.validate()?;

    let config_file = options
        .config_file
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty());

    let config = match config_file {
        Some(path) => {
            if options.config.is_set() {
                tracing::warn!(
                    config_file = %path.display(),
                    "ignoring --db-url/--root-key because --config-file was given"
                );
                println!("⚠️  Ignoring --db-url/--root-key because --config-file was given");
            }
            ConfigSource::File(expand_path(path, home))
        }
        None => {
            if !options.config.has_database_url() {
                return Err(ProvisionError::configuration(
                    "a db-url is required when initializing the database",
                ));
            }
            if !options.config.has_root_key() {
                return Err(ProvisionError::configuration(
                    "a root-key is required when initializing the database",
                ));
            }
            ConfigSource::Generated(options.config.generate_db_config_file())
        }
    };

    let explicit_version = options
        .version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let version = match (explicit_version, &options.package) {
        (Some(v), _) => v.to_string(),
        (None, Some(_)) => String::new(),
        (None, None) => versions
            .latest_version(PRODUCT)
            .map_err(|source| ProvisionError::VersionLookup { source })?,
    };

    Ok(InitDatabasePlan {
        package: options
            .package
            .as_deref()
            .map(|p| expand_path(p, home)),
        version,
        config,
    })
}

/// Populate a workspace on the target and run the install script.
/// The workspace is removed on every exit path.
pub fn run(
    op: &dyn CommandOperator,
    plan: &InitDatabasePlan,
    scripts: &dyn ScriptSource,
) -> Result<()> {
    let workspace = Workspace::create(op, WORKSPACE_PREFIX, &["config"])?;

    if let Some(package) = &plan.package {
        println!("Uploading Boundary package ...");
        op.upload_file(package, &workspace.path(PACKAGE_PATH), "0640")
            .map_err(|e| ProvisionError::upload("Boundary package", e))?;
    }

    let uploaded = match &plan.config {
        ConfigSource::Generated(text) => {
            println!("Uploading generated Boundary configuration ...");
            op.upload(
                &mut Cursor::new(text.as_bytes()),
                &workspace.path(CONFIG_PATH),
                "0640",
            )
        }
        ConfigSource::File(path) => {
            println!("Uploading {} as boundary.hcl ...", path.display());
            op.upload_file(path, &workspace.path(CONFIG_PATH), "0640")
        }
    };
    uploaded.map_err(|e| ProvisionError::upload("Boundary configuration", e))?;

    let mut script = scripts.open(INSTALL_BOUNDARY_DB)?;
    op.upload(&mut script, &workspace.path(SCRIPT_PATH), "0755")
        .map_err(|e| ProvisionError::upload("install script", e))?;

    println!("Initializing Boundary database ...");
    let output = op.execute(&install_command(workspace.dir(), &plan.version))?;
    tracing::debug!(%output, "install script output");

    println!("Done.");
    Ok(())
}

/// Resolve, connect, provision, release
pub fn init_database(
    target: &Target,
    settings: &Settings,
    options: &InitDatabaseOptions,
    versions: &dyn VersionResolver,
    scripts: &dyn ScriptSource,
) -> Result<()> {
    let plan = plan(target, options, versions, settings.home.as_deref())?;
    target.execute(settings, |op| run(op, &plan, scripts))
}

fn install_command(dir: &str, version: &str) -> String {
    format!(
        "cat {}/{} | TMP_DIR={} BOUNDARY_VERSION={} sh -\n",
        dir,
        SCRIPT_PATH,
        shell_escape(dir),
        shell_escape(version)
    )
}
