//! SSH command execution using russh crate

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use russh::client::KeyboardInteractiveAuthResponse;
use russh::keys::ssh_key;
use russh::{ChannelMsg, Disconnect, client};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

use crate::auth::Credentials;
use crate::error::ExecError;
use crate::result::{CommandResult, ConnectionInfo};
use crate::traits::RemoteExecutor;

/// Info requests answered before keyboard-interactive auth is abandoned
const MAX_INTERACTIVE_ROUNDS: usize = 4;

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler;

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // iDRACs present self-signed host keys that change on firmware reset
        Ok(true)
    }
}

/// SSH command executor
///
/// Holds at most one SSH session to the controller. The session is opened on
/// first use and released by [`RemoteExecutor::close`].
pub struct SshExecutor {
    /// Connection configuration
    conn_info: ConnectionInfo,
    /// Password credentials
    credentials: Credentials,
    /// SSH session (initialized on first use)
    session: Mutex<Option<client::Handle<SshClientHandler>>>,
}

impl std::fmt::Debug for SshExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshExecutor")
            .field("conn_info", &self.conn_info)
            .field("credentials", &self.credentials)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl SshExecutor {
    /// Create a new SSH executor
    ///
    /// The user in `conn_info` is the login user; `password` is used for
    /// password and keyboard-interactive authentication.
    pub fn new(conn_info: ConnectionInfo, password: impl Into<String>) -> Self {
        let credentials = Credentials::new(conn_info.user.clone(), password);
        Self {
            conn_info,
            credentials,
            session: Mutex::new(None),
        }
    }

    /// Get connection info
    pub fn connection_info(&self) -> &ConnectionInfo {
        &self.conn_info
    }

    /// Connect to the remote host
    #[instrument(skip(self), fields(host = %self.conn_info.host))]
    async fn connect(&self) -> Result<(), ExecError> {
        let mut session_lock = self.session.lock().await;

        if session_lock.is_some() {
            return Ok(());
        }

        info!(
            host = %self.conn_info.host,
            port = self.conn_info.port,
            user = %self.conn_info.user,
            "connecting to SSH"
        );

        let config = Arc::new(client::Config::default());

        let mut session = client::connect(
            config,
            (&self.conn_info.host[..], self.conn_info.port),
            SshClientHandler,
        )
        .await
        .map_err(|e| ExecError::ConnectionFailed(e.to_string()))?;

        if let Err(e) = self.authenticate(&mut session).await {
            // Best effort; the auth error is what the caller needs to see
            let _ = session
                .disconnect(Disconnect::ByApplication, "", "English")
                .await;
            return Err(e);
        }

        info!(host = %self.conn_info.host, "SSH connected and authenticated");

        *session_lock = Some(session);
        Ok(())
    }

    /// Try password auth, then keyboard-interactive with the same password
    async fn authenticate(
        &self,
        session: &mut client::Handle<SshClientHandler>,
    ) -> Result<(), ExecError> {
        let user = &self.credentials.user;

        let auth_res = session
            .authenticate_password(user, self.credentials.password())
            .await
            .map_err(|e| ExecError::AuthenticationFailed(e.to_string()))?;

        if auth_res.success() {
            return Ok(());
        }

        debug!(user = %user, "password auth refused, trying keyboard-interactive");

        let responder = self.credentials.responder();
        let mut response = session
            .authenticate_keyboard_interactive_start(user, None::<String>)
            .await
            .map_err(|e| ExecError::AuthenticationFailed(e.to_string()))?;

        for _ in 0..MAX_INTERACTIVE_ROUNDS {
            match response {
                KeyboardInteractiveAuthResponse::Success => return Ok(()),
                KeyboardInteractiveAuthResponse::Failure { .. } => break,
                KeyboardInteractiveAuthResponse::InfoRequest { prompts, .. } => {
                    debug!(prompts = prompts.len(), "answering keyboard-interactive request");
                    response = session
                        .authenticate_keyboard_interactive_respond(responder.answer(prompts.len()))
                        .await
                        .map_err(|e| ExecError::AuthenticationFailed(e.to_string()))?;
                }
            }
        }

        Err(ExecError::AuthenticationFailed(format!(
            "password and keyboard-interactive authentication refused for user {user}"
        )))
    }

    /// Execute command on remote host
    #[instrument(skip(self, cmd), fields(host = %self.conn_info.host))]
    async fn execute_remote(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        let mut session_lock = self.session.lock().await;

        let session = session_lock.as_mut().ok_or(ExecError::NotConnected)?;

        debug!(command = %cmd, "executing remote command");

        let start = Instant::now();

        let mut channel = session
            .channel_open_session()
            .await
            .map_err(|e| ExecError::SessionFailed(e.to_string()))?;

        channel
            .exec(true, cmd)
            .await
            .map_err(|e| ExecError::SessionFailed(e.to_string()))?;

        let mut status = -1;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Exit status may arrive after EOF, so drain until the channel closes
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => {
                    stdout.extend_from_slice(&data);
                }
                ChannelMsg::ExtendedData { data, ext } => {
                    if ext == 1 {
                        stderr.extend_from_slice(&data);
                    }
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    status = exit_status.cast_signed();
                }
                _ => {}
            }
        }

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&stdout).to_string();
        let stderr = String::from_utf8_lossy(&stderr).to_string();

        debug!(
            command = %cmd,
            status = status,
            stdout_bytes = stdout.len(),
            duration = ?duration,
            "remote command completed"
        );

        Ok(CommandResult {
            status,
            stdout,
            stderr,
            duration,
        })
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    #[instrument(skip(self), fields(host = %self.conn_info.host))]
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        self.connect().await?;
        self.execute_remote(cmd).await
    }

    #[instrument(skip(self), fields(host = %self.conn_info.host))]
    async fn run_with_timeout(
        &self,
        cmd: &str,
        timeout_duration: Duration,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        debug!(command = %cmd, timeout = ?timeout_duration, "executing with timeout");

        // Only the command is timed; dial and auth are left to TCP and the server
        self.connect().await?;

        match timeout(timeout_duration, self.execute_remote(cmd)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    command = %cmd,
                    timeout = ?timeout_duration,
                    elapsed = ?start.elapsed(),
                    "command timed out"
                );
                Err(ExecError::Timeout {
                    timeout: timeout_duration,
                })
            }
        }
    }

    async fn close(&self) -> Result<(), ExecError> {
        let mut session_lock = self.session.lock().await;

        if let Some(session) = session_lock.take() {
            session
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
                .map_err(|e| ExecError::Disconnect(e.to_string()))?;
            info!(host = %self.conn_info.host, "SSH disconnected");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        // A held lock means a command is in flight, which implies a session
        self.session
            .try_lock()
            .map(|s| s.is_some())
            .unwrap_or(true)
    }

    fn executor_type(&self) -> &'static str {
        "ssh"
    }
}

/// Builder for `SshExecutor`
pub struct SshExecutorBuilder {
    conn_info: ConnectionInfo,
    password: String,
}

impl SshExecutorBuilder {
    /// Create builder with required fields
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            conn_info: ConnectionInfo::new(host, user),
            password: String::new(),
        }
    }

    /// Set login password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.conn_info.port = port;
        self
    }

    /// Build the executor
    pub fn build(self) -> SshExecutor {
        SshExecutor::new(self.conn_info, self.password)
    }
}
