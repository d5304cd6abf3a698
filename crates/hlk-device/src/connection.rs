//! Connection traits and scoped connection handling

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::DeviceResult;
use crate::protocol::Command;

/// An open connection to the relay board
#[async_trait]
pub trait DeviceConnection: Send {
    /// Send one command frame
    async fn send(&mut self, command: Command) -> DeviceResult<()>;

    /// Read one raw response frame
    async fn read_frame(&mut self) -> DeviceResult<Vec<u8>>;

    /// Release the connection
    async fn close(&mut self) -> DeviceResult<()>;
}

/// Opens connections to the relay board
///
/// Implementations must be shareable across request handlers.
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    async fn connect(&self) -> DeviceResult<Box<dyn DeviceConnection>>;
}

/// Run `op` on a fresh connection and release it afterwards.
///
/// The connection is closed whether or not `op` succeeds. An error from `op`
/// wins over an error from closing; a close error alone fails the call.
pub async fn with_connection<T, F>(connector: &dyn DeviceConnector, op: F) -> DeviceResult<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut dyn DeviceConnection) -> BoxFuture<'c, DeviceResult<T>>,
{
    let mut conn = connector.connect().await?;
    let result = op(conn.as_mut()).await;
    let closed = conn.close().await;
    debug!(ok = result.is_ok(), "Device connection released");

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!(error = %close_err, "Failed to close device connection after error");
            Err(e)
        }
    }
}
