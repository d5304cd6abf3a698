//! TCP transport to the relay board

use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::connection::{DeviceConnection, DeviceConnector};
use crate::error::{DeviceError, DeviceResult};
use crate::protocol::{check_response, Command, FRAME_LEN};

/// Opens one TCP connection per operation to the board at `addr`
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>, connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            io_timeout,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl DeviceConnector for TcpConnector {
    async fn connect(&self) -> DeviceResult<Box<dyn DeviceConnection>> {
        debug!(addr = %self.addr, "Connecting to relay board");
        let stream = with_timeout(self.connect_timeout, TcpStream::connect(self.addr.as_str()))
            .await
            .map_err(|source| DeviceError::Connect {
                addr: self.addr.clone(),
                source,
            })?;
        // Frames are tiny; don't let Nagle hold them back.
        if let Err(e) = stream.set_nodelay(true) {
            debug!(addr = %self.addr, error = %e, "Failed to disable Nagle on device connection");
        }

        Ok(Box::new(TcpConnection {
            stream,
            io_timeout: self.io_timeout,
        }))
    }
}

/// A single open TCP connection to the board
pub struct TcpConnection {
    stream: TcpStream,
    io_timeout: Duration,
}

#[async_trait]
impl DeviceConnection for TcpConnection {
    async fn send(&mut self, command: Command) -> DeviceResult<()> {
        let frame = command.encode();
        trace!(?command, ?frame, "Sending command frame");
        with_timeout(self.io_timeout, self.stream.write_all(&frame))
            .await
            .map_err(DeviceError::Send)
    }

    async fn read_frame(&mut self) -> DeviceResult<Vec<u8>> {
        let mut frame = vec![0u8; FRAME_LEN];
        with_timeout(self.io_timeout, self.stream.read_exact(&mut frame))
            .await
            .map_err(DeviceError::Read)?;
        trace!(?frame, "Received response frame");
        check_response(&frame)?;
        Ok(frame)
    }

    async fn close(&mut self) -> DeviceResult<()> {
        with_timeout(self.io_timeout, self.stream.shutdown())
            .await
            .map_err(DeviceError::Close)
    }
}

async fn with_timeout<T, F>(limit: Duration, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("timed out after {:?}", limit),
        )),
    }
}
