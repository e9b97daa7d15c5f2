//! Loopback notification bus with a single active subscriber.
//!
//! # Purpose
//!
//! - Carry [`NotificationEvent`]s from background logic in one process to the presentation side in another.
//! - Exclude toast behavior; the subscriber hands events to `beacon-toast`.
//!
//! # Mental model
//!
//! - [`NotificationBus`] listens on `127.0.0.1` and remembers at most one subscriber connection.
//! - The newest connection wins. A superseded connection stays open but receives nothing further.
//! - [`NotificationBus::publish`] is fire-and-forget: no queue, no retry, no acknowledgement.
//! - [`NotificationClient`] connects once, reads newline-delimited JSON frames, and never reconnects.
//!
//! # Invariants
//!
//! 1. At most one subscriber MUST be registered at any instant.
//!    - Enforced in: `NotificationBus::on_connect`
//!    - Tested by: `bus::tests::newest_connection_supersedes`
//!    - Failure symptom: duplicate toasts, one per stale listener.
//!
//! 2. A disconnect MUST only clear the slot when it belongs to the disconnecting connection.
//!    - Enforced in: `NotificationBus::on_disconnect`
//!    - Tested by: `bus::tests::stale_disconnect_keeps_current_subscriber`
//!    - Failure symptom: an old connection closing silences the live listener.
//!
//! 3. A malformed frame MUST NOT end the client connection.
//!    - Enforced in: `NotificationClient::run`
//!    - Tested by: `client::tests::malformed_frames_are_skipped`
//!    - Failure symptom: one bad publisher line stops all later toasts.
//!
//! # Concurrency and ordering
//!
//! - The subscriber slot is a `parking_lot::Mutex`, held only for a swap or a channel send and never across an await.
//! - Each connection has its own writer task; frames published to one subscriber arrive in publish order.

#![warn(missing_docs)]

mod bus;
mod client;
mod notifier;

pub use beacon_proto::NotificationEvent;
pub use bus::{Delivery, NotificationBus, SubscriberId};
pub use client::{ClientError, ClientExit, NotificationClient};
pub use notifier::Notifier;
