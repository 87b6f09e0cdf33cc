//! Control Port Relay Source
//!
//! Implements RelaySource/RelaySession against the daemon's control
//! interface, over TCP or a Unix domain socket. Only the exchanges the
//! aggregation needs are spoken: PROTOCOLINFO to learn the accepted
//! authentication methods, AUTHENTICATE, and GETINFO ns/all.

use crate::config::ConnectMethod;
use crate::domain::entities::RelayStatus;
use crate::domain::ports::{ControlError, RelaySession, RelaySource};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, UnixStream};

/// Control-session factory configured with the transport selector.
pub struct ControlPortSource {
    connect: ConnectMethod,
}

impl ControlPortSource {
    pub fn new(connect: ConnectMethod) -> Self {
        Self { connect }
    }
}

#[async_trait]
impl RelaySource for ControlPortSource {
    async fn connect(&self) -> Result<Box<dyn RelaySession>, ControlError> {
        match &self.connect {
            ConnectMethod::Port(port) => {
                let stream = TcpStream::connect(("127.0.0.1", *port))
                    .await
                    .map_err(ControlError::Connect)?;
                Ok(Box::new(ControlSession::new(stream)))
            }
            ConnectMethod::Socket(path) => {
                let stream = UnixStream::connect(path)
                    .await
                    .map_err(ControlError::Connect)?;
                Ok(Box::new(ControlSession::new(stream)))
            }
        }
    }
}

/// One open control connection. Dropping it closes the transport.
pub struct ControlSession<S> {
    stream: BufReader<S>,
}

impl<S> std::fmt::Debug for ControlSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSession").finish_non_exhaustive()
    }
}

/// A parsed control reply: final status line plus any intermediate
/// payload lines (continuations and multi-line data bodies).
#[derive(Debug)]
struct Reply {
    status: u16,
    text: String,
    lines: Vec<String>,
}

enum ReplyLine {
    Final { status: u16, text: String },
    Continuation { text: String },
    DataStart,
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send> ControlSession<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    async fn send_line(&mut self, line: &str) -> Result<(), ControlError> {
        let stream = self.stream.get_mut();
        stream.write_all(line.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_raw_line(&mut self) -> Result<String, ControlError> {
        let mut line = String::new();
        let n = self.stream.read_line(&mut line).await?;
        if n == 0 {
            return Err(ControlError::Protocol(
                "connection closed mid-reply".to_string(),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read one complete reply: intermediate lines up to and including
    /// the final "NNN text" line. Multi-line data blocks are collected
    /// until their "." terminator.
    async fn read_reply(&mut self) -> Result<Reply, ControlError> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_raw_line().await?;
            match classify_line(&line)? {
                ReplyLine::Final { status, text } => {
                    return Ok(Reply {
                        status,
                        text,
                        lines,
                    })
                }
                ReplyLine::Continuation { text } => lines.push(text),
                ReplyLine::DataStart => loop {
                    let data_line = self.read_raw_line().await?;
                    if data_line == "." {
                        break;
                    }
                    lines.push(data_line);
                },
            }
        }
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Unpin + Send> RelaySession for ControlSession<S> {
    async fn authenticate(&mut self, password: Option<&str>) -> Result<(), ControlError> {
        self.send_line("PROTOCOLINFO 1").await?;
        let reply = self.read_reply().await?;
        if reply.status != 250 {
            return Err(ControlError::Protocol(format!(
                "PROTOCOLINFO failed: {} {}",
                reply.status, reply.text
            )));
        }

        let methods = auth_methods(&reply.lines);
        if methods.is_empty() || methods.iter().any(|m| m == "NULL") {
            self.send_line("AUTHENTICATE").await?;
        } else {
            let Some(password) = password else {
                return Err(ControlError::PasswordRequired);
            };
            self.send_line(&format!("AUTHENTICATE \"{}\"", escape_password(password)))
                .await?;
        }

        let reply = self.read_reply().await?;
        match reply.status {
            250 => Ok(()),
            515 => Err(ControlError::PasswordRejected),
            status => Err(ControlError::Protocol(format!(
                "unexpected AUTHENTICATE reply: {} {}",
                status, reply.text
            ))),
        }
    }

    async fn network_statuses(&mut self) -> Result<Vec<RelayStatus>, ControlError> {
        self.send_line("GETINFO ns/all").await?;
        let reply = self.read_reply().await?;
        if reply.status != 250 {
            return Err(ControlError::Protocol(format!(
                "GETINFO ns/all failed: {} {}",
                reply.status, reply.text
            )));
        }
        Ok(parse_network_statuses(&reply.lines))
    }
}

/// Split a "NNN<sep>text" control line into its parts.
fn classify_line(line: &str) -> Result<ReplyLine, ControlError> {
    if line.len() < 4 || !line.is_char_boundary(3) {
        return Err(ControlError::Protocol(format!(
            "short control line: {:?}",
            line
        )));
    }
    let (code, rest) = line.split_at(3);
    let status: u16 = code
        .parse()
        .map_err(|_| ControlError::Protocol(format!("bad status code in {:?}", line)))?;
    let text = rest.get(1..).unwrap_or("").to_string();
    match rest.as_bytes()[0] {
        b' ' => Ok(ReplyLine::Final { status, text }),
        b'-' => Ok(ReplyLine::Continuation { text }),
        b'+' => Ok(ReplyLine::DataStart),
        _ => Err(ControlError::Protocol(format!(
            "bad separator in {:?}",
            line
        ))),
    }
}

/// Extract the accepted methods from a PROTOCOLINFO "AUTH METHODS=..."
/// line. An empty list means the daemon advertised nothing usable and
/// the passwordless handshake is attempted anyway.
fn auth_methods(lines: &[String]) -> Vec<String> {
    for line in lines {
        if let Some(rest) = line.strip_prefix("AUTH METHODS=") {
            let methods = rest.split_whitespace().next().unwrap_or("");
            return methods
                .split(',')
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
    Vec::new()
}

/// Quote a password for the AUTHENTICATE command.
fn escape_password(password: &str) -> String {
    password.replace('\\', "\\\\").replace('"', "\\\"")
}

/// One RelayStatus per `r` line of a consensus-style listing.
///
/// Lines that are not well-formed status entries (flag lines, bandwidth
/// lines, the "ns/all=" prefix) are skipped.
fn parse_network_statuses(lines: &[String]) -> Vec<RelayStatus> {
    lines.iter().filter_map(|l| parse_status_line(l)).collect()
}

/// Parse one `r` line:
/// `r <nickname> <identity> <digest> <date> <time> <address> <orport> <dirport>`
fn parse_status_line(line: &str) -> Option<RelayStatus> {
    let fields: Vec<&str> = line.split_ascii_whitespace().collect();
    if fields.first() != Some(&"r") || fields.len() < 9 {
        return None;
    }
    Some(RelayStatus {
        nickname: fields[1].to_string(),
        address: fields[6].parse().ok()?,
        or_port: fields[7].parse().ok()?,
    })
}
