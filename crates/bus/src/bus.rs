//! Server side of the notification bus.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use beacon_proto::{MAX_FRAME_LEN, NotificationEvent, encode_frame, loopback};
use futures::SinkExt;
use parking_lot::Mutex;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedWrite, LinesCodec};
use tokio_util::sync::CancellationToken;

use crate::notifier::Notifier;

/// Identifies one subscriber registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Outcome of [`NotificationBus::publish`]. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
	/// Handed to the current subscriber's connection.
	Delivered,
	/// Nobody is listening; the event was discarded.
	NoSubscriber,
	/// The subscriber's writer is gone, or the event could not be framed.
	Dropped,
}

#[derive(Debug)]
struct Subscriber {
	id: SubscriberId,
	frames: mpsc::UnboundedSender<String>,
}

#[derive(Debug, Default)]
struct Inner {
	subscriber: Mutex<Option<Subscriber>>,
	next_id: AtomicU64,
}

/// Single-subscriber broadcast point.
///
/// Cheap to clone; all clones share the subscriber slot.
#[derive(Debug, Clone, Default)]
pub struct NotificationBus {
	inner: Arc<Inner>,
}

impl NotificationBus {
	/// Creates a bus with no subscriber and no listener.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `127.0.0.1:port` and spawns the accept loop.
	///
	/// Port 0 picks a free port; the bound address is returned.
	///
	/// # Errors
	///
	/// Returns an error if the port cannot be bound.
	pub async fn start(
		&self,
		port: u16,
		shutdown: CancellationToken,
	) -> io::Result<(SocketAddr, JoinHandle<io::Result<()>>)> {
		let listener = TcpListener::bind(loopback(port)).await?;
		let addr = listener.local_addr()?;
		let bus = self.clone();
		let task = tokio::spawn(async move { bus.serve(listener, shutdown).await });
		Ok((addr, task))
	}

	/// Accepts subscriber connections until `shutdown` fires.
	///
	/// # Errors
	///
	/// Returns an error if the listener address cannot be read.
	pub async fn serve(&self, listener: TcpListener, shutdown: CancellationToken) -> io::Result<()> {
		tracing::info!(addr = %listener.local_addr()?, "bus.listening");

		loop {
			tokio::select! {
				_ = shutdown.cancelled() => {
					tracing::info!("bus.shutdown");
					break;
				}
				res = listener.accept() => {
					match res {
						Ok((stream, peer)) => {
							tokio::spawn(self.clone().handle_connection(stream, peer, shutdown.clone()));
						}
						Err(e) => {
							tracing::error!(error = %e, "bus.accept_failed");
						}
					}
				}
			}
		}

		Ok(())
	}

	/// Registers a new subscriber, superseding any previous one.
	///
	/// The previous connection is not closed; its frame channel is dropped so
	/// it simply receives nothing further.
	pub fn on_connect(&self, frames: mpsc::UnboundedSender<String>) -> SubscriberId {
		let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
		let previous = self.inner.subscriber.lock().replace(Subscriber { id, frames });
		match previous {
			Some(previous) => tracing::debug!(subscriber = id.0, superseded = previous.id.0, "bus.subscriber_replaced"),
			None => tracing::debug!(subscriber = id.0, "bus.subscriber_registered"),
		}
		id
	}

	/// Clears the subscriber slot if it still holds `id`.
	///
	/// Returns true when the slot was cleared.
	pub fn on_disconnect(&self, id: SubscriberId) -> bool {
		let mut slot = self.inner.subscriber.lock();
		if slot.as_ref().is_some_and(|current| current.id == id) {
			*slot = None;
			tracing::debug!(subscriber = id.0, "bus.subscriber_cleared");
			true
		} else {
			false
		}
	}

	/// Sends `event` to the current subscriber, if any.
	///
	/// Never blocks and never retries.
	pub fn publish(&self, event: &NotificationEvent) -> Delivery {
		let frame = match encode_frame(event) {
			Ok(frame) => frame,
			Err(error) => {
				tracing::warn!(%error, "bus.publish.unencodable");
				return Delivery::Dropped;
			}
		};

		let slot = self.inner.subscriber.lock();
		let Some(subscriber) = slot.as_ref() else {
			tracing::trace!(success = event.success, "bus.publish.no_subscriber");
			return Delivery::NoSubscriber;
		};
		match subscriber.frames.send(frame) {
			Ok(()) => {
				tracing::trace!(subscriber = subscriber.id.0, success = event.success, "bus.publish");
				Delivery::Delivered
			}
			Err(_) => {
				tracing::debug!(subscriber = subscriber.id.0, "bus.publish.writer_gone");
				Delivery::Dropped
			}
		}
	}

	/// Returns true while a subscriber is registered.
	pub fn has_subscriber(&self) -> bool {
		self.inner.subscriber.lock().is_some()
	}

	/// Returns a publishing handle for this bus.
	pub fn notifier(&self) -> Notifier {
		Notifier::new(self.clone())
	}

	async fn handle_connection(self, stream: TcpStream, peer: SocketAddr, shutdown: CancellationToken) {
		tracing::info!(%peer, "bus.connection_opened");
		let (mut reader, writer) = stream.into_split();
		let mut writer = FramedWrite::new(writer, LinesCodec::new_with_max_length(MAX_FRAME_LEN));
		let (tx, mut rx) = mpsc::unbounded_channel();
		let id = self.on_connect(tx);

		let mut subscribed = true;
		let mut scratch = [0u8; 512];
		loop {
			tokio::select! {
				_ = shutdown.cancelled() => break,
				frame = rx.recv(), if subscribed => {
					let Some(frame) = frame else {
						// Superseded: stay open until the peer hangs up.
						tracing::debug!(%peer, subscriber = id.0, "bus.connection_superseded");
						subscribed = false;
						continue;
					};
					if let Err(e) = writer.send(frame).await {
						tracing::warn!(%peer, error = %e, "bus.write_failed");
						break;
					}
				}
				read = reader.read(&mut scratch) => {
					match read {
						Ok(0) => break,
						// Subscribers have nothing to say; inbound bytes are discarded.
						Ok(n) => tracing::trace!(%peer, bytes = n, "bus.inbound_ignored"),
						Err(e) => {
							tracing::debug!(%peer, error = %e, "bus.read_failed");
							break;
						}
					}
				}
			}
		}

		self.on_disconnect(id);
		tracing::info!(%peer, "bus.connection_closed");
	}
}
