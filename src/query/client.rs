use super::{Player, QueryClient, QueryError, ServerInfo};
use crate::settings::ServerAddress;
use a2s::errors::Error as A2sError;
use a2s::A2SClient;
use std::time::Duration;

/// Blocking A2S client. Each query opens its own socket so the timeout
/// applies to that exchange only.
#[derive(Debug, Default, Clone)]
pub struct A2sClient;

impl A2sClient {
    pub fn new() -> Self {
        Self
    }

    fn connect(&self, timeout: Duration) -> Result<A2SClient, QueryError> {
        let mut client = A2SClient::new()?;
        client.set_timeout(timeout)?;
        Ok(client)
    }
}

impl QueryClient for A2sClient {
    fn info(&self, addr: &ServerAddress, timeout: Duration) -> Result<ServerInfo, QueryError> {
        let info = self.connect(timeout)?.info((addr.host.as_str(), addr.port))?;
        Ok(ServerInfo {
            server_name: info.name,
            map_name: info.map,
            player_count: u32::from(info.players),
            max_players: u32::from(info.max_players),
        })
    }

    fn players(&self, addr: &ServerAddress, timeout: Duration) -> Result<Vec<Player>, QueryError> {
        let players = self.connect(timeout)?.players((addr.host.as_str(), addr.port))?;
        Ok(players
            .into_iter()
            .map(|p| Player { name: p.name, duration: p.duration })
            .collect())
    }
}

impl From<A2sError> for QueryError {
    fn from(e: A2sError) -> Self {
        match e {
            A2sError::Io(io) => QueryError::from(io),
            other => QueryError::Other(other.to_string()),
        }
    }
}
