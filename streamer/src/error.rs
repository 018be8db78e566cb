//! Errors surfaced by the streamer.
//!
//! Everything here ends the run. Acknowledgment timeouts and unparsable
//! replies never become errors; the loop swallows them.

use std::io;
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum StreamerError {
    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The single connection attempt at startup failed.
    #[error("could not connect to the visualization host at {addr}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to send position update")]
    Send(#[source] io::Error),

    /// The host shut its side of the socket.
    #[error("the visualization host closed the connection")]
    HostClosed,
}

impl StreamerError {
    pub(crate) fn invalid_setting(key: &'static str, value: &str) -> Self {
        StreamerError::InvalidSetting {
            key,
            value: value.to_string(),
        }
    }

    /// True when nothing was listening at the host address.
    pub fn is_host_unavailable(&self) -> bool {
        matches!(
            self,
            StreamerError::Connect { source, .. } if source.kind() == io::ErrorKind::ConnectionRefused
        )
    }
}
