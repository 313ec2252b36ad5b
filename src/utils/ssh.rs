use crate::error::{ProvisionError, Result};
use crate::utils::string::parse_mode;
use ssh2::{ExtendedData, FileStat, OpenFlags, OpenType, Session};
use std::io::{self, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How to authenticate against the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Password(String),
    Key {
        path: PathBuf,
        passphrase: Option<String>,
    },
    Agent,
}

impl AuthMethod {
    fn describe(&self) -> &'static str {
        match self {
            AuthMethod::Password(_) => "password",
            AuthMethod::Key { .. } => "private key",
            AuthMethod::Agent => "ssh-agent",
        }
    }
}

/// Authenticated SSH session used for remote command execution and uploads.
/// The session is disconnected when the connection is dropped.
pub struct SshConnection {
    session: Session,
    target: String,
}

impl SshConnection {
    /// Connect and authenticate. `timeout` bounds the TCP connect, the
    /// handshake and authentication; commands run afterwards are unbounded.
    pub fn connect(
        host: &str,
        port: u16,
        user: &str,
        auth: &AuthMethod,
        timeout: Duration,
    ) -> Result<Self> {
        let target = format!("{}@{}:{}", user, host, port);
        let conn_err = |reason: String| ProvisionError::connection(&target, reason);

        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| conn_err(format!("unable to resolve address: {}", e)))?;

        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        let tcp = match (stream, last_err) {
            (Some(s), _) => s,
            (None, Some(e)) => return Err(conn_err(e.to_string())),
            (None, None) => return Err(conn_err("address resolved to nothing".to_string())),
        };

        let mut session = Session::new().map_err(|e| conn_err(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session.handshake().map_err(|e| conn_err(e.to_string()))?;

        let auth_result = match auth {
            AuthMethod::Password(password) => session.userauth_password(user, password),
            AuthMethod::Key { path, passphrase } => {
                session.userauth_pubkey_file(user, None, path, passphrase.as_deref())
            }
            AuthMethod::Agent => session.userauth_agent(user),
        };
        auth_result.map_err(|e| {
            conn_err(format!("{} authentication failed: {}", auth.describe(), e))
        })?;

        if !session.authenticated() {
            return Err(conn_err(format!(
                "{} authentication was rejected",
                auth.describe()
            )));
        }

        // Connection-establishment timeout only; 0 disables it
        session.set_timeout(0);
        tracing::debug!(host = %target, method = auth.describe(), "ssh session established");

        Ok(Self { session, target })
    }

    /// Run a command in the remote user's default shell, stderr merged into stdout
    pub fn execute(&self, command: &str) -> Result<String> {
        let transport = |e: ssh2::Error| ProvisionError::transport(command, e);

        let mut channel = self.session.channel_session().map_err(transport)?;
        channel
            .handle_extended_data(ExtendedData::Merge)
            .map_err(transport)?;
        channel.exec(command).map_err(transport)?;

        let mut raw = Vec::new();
        channel
            .read_to_end(&mut raw)
            .map_err(|e| ProvisionError::transport(command, e))?;
        channel.wait_close().map_err(transport)?;
        let status = channel.exit_status().map_err(transport)?;
        let signal = channel.exit_signal().map_err(transport)?.exit_signal;
        let output = String::from_utf8_lossy(&raw).to_string();

        command_result(command, status, signal, output)
    }

    /// Write `content` to `remote_path` over SFTP and set the exact mode
    pub fn upload(&self, content: &mut dyn Read, remote_path: &str, mode: &str) -> Result<()> {
        let mode = parse_mode(mode)?;
        let label = format!("sftp write {}", remote_path);
        let transport = |e: ssh2::Error| ProvisionError::transport(&label, e);
        let path = Path::new(remote_path);

        let sftp = self.session.sftp().map_err(transport)?;
        let mut file = sftp
            .open_mode(
                path,
                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
                mode as i32,
                OpenType::File,
            )
            .map_err(transport)?;
        io::copy(content, &mut file).map_err(|e| ProvisionError::transport(&label, e))?;
        drop(file);

        // open_mode is subject to the remote umask
        sftp.setstat(
            path,
            FileStat {
                size: None,
                uid: None,
                gid: None,
                perm: Some(mode),
                atime: None,
                mtime: None,
            },
        )
        .map_err(transport)?;

        Ok(())
    }
}

/// Map a finished channel to a result. libssh2 reports exit status 0 when the
/// server sent `exit-signal` instead of `exit-status`, so the signal is checked first.
fn command_result(
    command: &str,
    status: i32,
    signal: Option<String>,
    mut output: String,
) -> Result<String> {
    if let Some(name) = signal.filter(|name| !name.is_empty()) {
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&format!("killed by signal SIG{}", name));
        return Err(ProvisionError::Execution {
            command: command.to_string(),
            status: None,
            output,
        });
    }
    if status != 0 {
        return Err(ProvisionError::Execution {
            command: command.to_string(),
            status: Some(status),
            output,
        });
    }
    Ok(output)
}

impl Drop for SshConnection {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "provisioning finished", None) {
            tracing::debug!(host = %self.target, error = %e, "ssh disconnect failed");
        }
    }
}
