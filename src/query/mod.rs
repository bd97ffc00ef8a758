mod client;

pub use client::A2sClient;

use crate::settings::ServerAddress;
use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub server_name: String,
    pub map_name: String,
    pub player_count: u32,
    pub max_players: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    /// Seconds connected.
    pub duration: f32,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("timed out waiting for server")]
    Timeout,
    #[error("connection refused")]
    Refused,
    #[error("{0}")]
    Other(String),
}

impl QueryError {
    /// Banner text shown for a failed poll.
    pub fn banner(&self) -> &'static str {
        match self {
            QueryError::Timeout => "Timeout connecting to server.",
            QueryError::Refused => "Connection refused by server.",
            QueryError::Other(_) => "Error fetching server info.",
        }
    }
}

impl From<io::Error> for QueryError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => QueryError::Timeout,
            io::ErrorKind::ConnectionRefused => QueryError::Refused,
            _ => QueryError::Other(e.to_string()),
        }
    }
}

/// The two status queries a poll cycle needs. Both block for at most `timeout`.
pub trait QueryClient {
    fn info(&self, addr: &ServerAddress, timeout: Duration) -> Result<ServerInfo, QueryError>;
    fn players(&self, addr: &ServerAddress, timeout: Duration) -> Result<Vec<Player>, QueryError>;
}
