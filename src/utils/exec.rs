use crate::error::{ProvisionError, Result};
use crate::utils::ssh::SshConnection;
use std::io::Read;
use std::path::Path;

/// Local command execution helpers
pub mod local {
    use crate::error::{ProvisionError, Result};
    use crate::utils::string::{bytes_to_string, parse_mode};
    use std::fs::{File, OpenOptions};
    use std::io::{self, Read};
    use std::path::Path;
    use std::process::{Command, Stdio};

    /// Run a command through `sh -c`, returning stdout followed by stderr
    pub fn execute_shell(command: &str) -> Result<String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ProvisionError::transport(command, e))?;

        let mut combined = bytes_to_string(&output.stdout);
        combined.push_str(&bytes_to_string(&output.stderr));

        if !output.status.success() {
            return Err(ProvisionError::Execution {
                command: command.to_string(),
                status: output.status.code(),
                output: combined,
            });
        }

        Ok(combined)
    }

    /// Write `content` to `path`, replacing any existing file, then apply `mode`
    pub fn write_file(content: &mut dyn Read, path: &str, mode: &str) -> Result<()> {
        let mode = parse_mode(mode)?;
        let io_err = |source: io::Error| ProvisionError::Io {
            path: Path::new(path).to_path_buf(),
            source,
        };

        let mut file = create_file(path, mode).map_err(io_err)?;
        io::copy(content, &mut file).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        set_permissions(path, mode).map_err(io_err)
    }

    /// Create or truncate `path`. On unix a new file starts out with `mode`
    /// (masked by the umask) so it is never more permissive than requested.
    #[cfg(unix)]
    fn create_file(path: &str, mode: u32) -> io::Result<File> {
        use std::os::unix::fs::OpenOptionsExt;
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(mode)
            .open(path)
    }

    #[cfg(not(unix))]
    fn create_file(path: &str, _mode: u32) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }

    #[cfg(unix)]
    fn set_permissions(path: &str, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn set_permissions(path: &str, mode: u32) -> io::Result<()> {
        let mut permissions = std::fs::metadata(path)?.permissions();
        permissions.set_readonly(mode & 0o222 == 0);
        std::fs::set_permissions(path, permissions)
    }
}

/// Execute commands and place files on a target, independent of transport
///
/// Workflows are written against this trait and never branch on whether the
/// target is the local machine or a remote host. Implementations are used
/// sequentially; concurrent calls against one connection are not supported.
pub trait CommandOperator {
    /// Run a shell command and return its combined output.
    /// A non-zero exit is an `Execution` error carrying that output.
    fn execute(&self, command: &str) -> Result<String>;

    /// Stream `content` to `remote_path`, overwriting it, and set `mode`
    /// (an octal string such as "0640") on the result.
    fn upload(&self, content: &mut dyn Read, remote_path: &str, mode: &str) -> Result<()>;

    /// Upload a local file
    fn upload_file(&self, local_path: &Path, remote_path: &str, mode: &str) -> Result<()> {
        let mut file = std::fs::File::open(local_path).map_err(|source| ProvisionError::Io {
            path: local_path.to_path_buf(),
            source,
        })?;
        self.upload(&mut file, remote_path, mode)
    }
}

/// Executor that runs either on this machine or over an SSH session
pub enum Executor {
    Local,
    Remote(SshConnection),
}

impl Executor {
    /// Check if this is a local executor
    pub fn is_local(&self) -> bool {
        matches!(self, Executor::Local)
    }
}

impl CommandOperator for Executor {
    fn execute(&self, command: &str) -> Result<String> {
        tracing::debug!(command, local = self.is_local(), "execute");
        match self {
            Executor::Local => local::execute_shell(command),
            Executor::Remote(conn) => conn.execute(command),
        }
    }

    fn upload(&self, content: &mut dyn Read, remote_path: &str, mode: &str) -> Result<()> {
        tracing::debug!(remote_path, mode, local = self.is_local(), "upload");
        match self {
            Executor::Local => local::write_file(content, remote_path, mode),
            Executor::Remote(conn) => conn.upload(content, remote_path, mode),
        }
    }
}
