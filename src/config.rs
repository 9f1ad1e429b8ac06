//! Client configuration with sensible defaults.

use std::time::Duration;

/// Connection and framing settings shared by [crate::client::Client] and
/// [crate::session::Session].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long to wait for the TCP connection to open.
    pub connect_timeout: Duration,

    /// How long a single receive may wait for data. `None` waits forever.
    pub read_timeout: Option<Duration>,

    /// Largest packet (including the size field) we are willing to buffer.
    pub max_packet_size: usize,

    /// Bytes requested from the transport per read.
    pub read_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Some(Duration::from_secs(10)),
            max_packet_size: 64 * 1024,
            read_chunk_size: 4096,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [ClientConfig]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn max_packet_size(mut self, size: usize) -> Self {
        self.config.max_packet_size = size;
        self
    }

    /// Clamped to at least one byte.
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size.max(1);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
