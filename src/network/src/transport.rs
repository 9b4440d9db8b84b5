//! Connectivity drivers used by the bootstrap.

use crate::errors::NetworkError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Something that can attempt to bring the link up once.
#[async_trait]
pub trait ConnectivityDriver: Send {
    /// Makes one connection attempt.
    async fn connect(&mut self) -> Result<(), NetworkError>;

    /// Pause before the next attempt after a failure.
    fn retry_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Probes the node by opening a TCP connection to it.
#[derive(Clone, Debug)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
    retry_delay: Duration,
}

impl TcpProbe {
    /// Creates a probe for `address` in `host:port` form.
    pub fn new(address: impl Into<String>, timeout: Duration, retry_delay: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            retry_delay,
        }
    }

    /// Returns the probed address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ConnectivityDriver for TcpProbe {
    async fn connect(&mut self) -> Result<(), NetworkError> {
        debug!("Probing {}", self.address);

        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(NetworkError::ConnectionFailed(format!(
                "{}: {}",
                self.address, e
            ))),
            Err(_) => Err(NetworkError::Timeout(self.address.clone())),
        }
    }

    fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}
