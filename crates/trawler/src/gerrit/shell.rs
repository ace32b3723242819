//! SSH command channel for the gerrit adapter.
//!
//! The trait seam mirrors the HTTP transport boundary: the adapter talks to
//! a `ShellTransport`, production uses libssh2, tests script the output.

use std::io::Read;
use std::net::TcpStream;

use async_trait::async_trait;

use crate::source::{Result, SourceError};

/// Remote command execution over a secure shell channel.
#[async_trait]
pub trait ShellTransport: Send + Sync {
    /// Run `command` as `user` on `host:port` and return its stdout.
    async fn exec(&self, user: &str, host: &str, port: u16, command: &str) -> Result<String>;
}

/// Production transport backed by libssh2, authenticating through the
/// local SSH agent (the user's key must already be known to the server).
pub struct Ssh2Transport;

#[async_trait]
impl ShellTransport for Ssh2Transport {
    async fn exec(&self, user: &str, host: &str, port: u16, command: &str) -> Result<String> {
        let user = user.to_string();
        let host = host.to_string();
        let command = command.to_string();

        // libssh2 is blocking; keep the runtime's workers free while the
        // remote command runs.
        tokio::task::spawn_blocking(move || run_command(&user, &host, port, &command))
            .await
            .map_err(|e| SourceError::transport(format!("ssh task failed: {e}")))?
    }
}

fn run_command(user: &str, host: &str, port: u16, command: &str) -> Result<String> {
    let stream = TcpStream::connect((host, port))
        .map_err(|e| SourceError::transport(format!("connect {host}:{port}: {e}")))?;

    let mut session = ssh2::Session::new()
        .map_err(|e| SourceError::transport(format!("ssh session: {e}")))?;
    session.set_tcp_stream(stream);
    session
        .handshake()
        .map_err(|e| SourceError::transport(format!("ssh handshake with {host}: {e}")))?;
    session
        .userauth_agent(user)
        .map_err(|_| SourceError::AuthRejected)?;

    let mut channel = session
        .channel_session()
        .map_err(|e| SourceError::transport(format!("ssh channel: {e}")))?;
    channel
        .exec(command)
        .map_err(|e| SourceError::transport(format!("exec '{command}': {e}")))?;

    let mut output = String::new();
    channel
        .read_to_string(&mut output)
        .map_err(|e| SourceError::transport(format!("read '{command}' output: {e}")))?;
    channel.wait_close().ok();

    Ok(output)
}
