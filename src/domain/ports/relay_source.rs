//! Relay Status Source Port
//!
//! Defines the interface to the daemon's control session: a factory
//! handing out one authenticated session per aggregation attempt.

use crate::domain::entities::RelayStatus;
use async_trait::async_trait;

/// Errors from the control-session collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("connection to the control interface failed: {0}")]
    Connect(#[source] std::io::Error),
    #[error("control session I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("daemon requires a control password, set the 'torpassword' environment variable")]
    PasswordRequired,
    #[error("daemon rejected the control password")]
    PasswordRejected,
    #[error("unexpected control reply: {0}")]
    Protocol(String),
}

impl ControlError {
    /// Authentication failures are reported to the operator and absorbed
    /// as an empty result; every other variant aborts the aggregation
    /// attempt.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::PasswordRequired | Self::PasswordRejected)
    }
}

/// Factory for control sessions.
///
/// Each aggregation attempt opens its own session and drops it when the
/// attempt ends, on every exit path.
#[async_trait]
pub trait RelaySource: Send + Sync {
    /// Open a fresh, not yet authenticated control session.
    async fn connect(&self) -> Result<Box<dyn RelaySession>, ControlError>;
}

/// An open control session. Dropping it closes the connection.
#[async_trait]
pub trait RelaySession: Send + std::fmt::Debug {
    /// Authenticate the session.
    ///
    /// Proceeds silently when the daemon needs no credential. Fails with
    /// `PasswordRequired` when a credential is needed but `password` is
    /// None, and with `PasswordRejected` when the daemon refuses it.
    async fn authenticate(&mut self, password: Option<&str>) -> Result<(), ControlError>;

    /// Enumerate all currently known network-status entries.
    ///
    /// The enumeration is consumed at most once per session; a failure
    /// mid-listing aborts the whole attempt rather than returning a
    /// truncated result.
    async fn network_statuses(&mut self) -> Result<Vec<RelayStatus>, ControlError>;
}
