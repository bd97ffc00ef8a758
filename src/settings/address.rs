use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Invalid IP format. Use IP:Port")]
    InvalidFormat,
    #[error("Invalid port number.")]
    InvalidPort,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub fn connect_url(&self) -> String {
        format!("steam://connect/{}", self)
    }
}

impl FromStr for ServerAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.trim().split_once(':').ok_or(AddressError::InvalidFormat)?;
        let host = host.trim();
        if host.is_empty() {
            return Err(AddressError::InvalidFormat);
        }

        let port: u16 = port.trim().parse().map_err(|_| AddressError::InvalidPort)?;
        if port == 0 {
            return Err(AddressError::InvalidPort);
        }

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
