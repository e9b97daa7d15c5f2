//! Shared wire types for the beacon notification bus.
//!
//! The bus and its single subscriber exchange newline-delimited JSON text
//! frames over a loopback TCP socket. There is exactly one message kind,
//! [`NotificationEvent`]; frames carry no envelope, version, or discriminator.

#![warn(missing_docs)]

pub mod addr;
pub mod codec;
pub mod event;

pub use addr::{DEFAULT_PORT, PORT_ENV, default_port, loopback, port_from_env};
pub use codec::{MAX_FRAME_LEN, ProtoError, decode_frame, encode_frame};
pub use event::{NotificationEvent, OVERFLOW_THRESHOLD};
