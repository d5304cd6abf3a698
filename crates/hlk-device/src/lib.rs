//! Client for the HLK-SW16 relay board
//!
//! The board speaks a fixed 20-byte binary protocol over TCP. This crate
//! encodes the three commands the service needs (status, relay on, relay
//! off), reads raw response frames and hands them back undecoded; turning
//! a frame into relay states is left to `hlk_core`.
//!
//! Every operation runs on its own connection. [`with_connection`] opens
//! one, runs the operation and always closes it again:
//!
//! ```ignore
//! use hlk_device::{with_connection, Command, TcpConnector};
//!
//! let frame = with_connection(&connector, |conn| {
//!     Box::pin(async move {
//!         conn.send(Command::Status).await?;
//!         conn.read_frame().await
//!     })
//! })
//! .await?;
//! ```

mod connection;
mod error;
mod protocol;
mod tcp;

pub use connection::{with_connection, DeviceConnection, DeviceConnector};
pub use error::{DeviceError, DeviceResult};
pub use protocol::{check_response, Command, FRAME_LEN, RESPONSE_END, RESPONSE_START};
pub use tcp::{TcpConnection, TcpConnector};
