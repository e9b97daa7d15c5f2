//! Cloneable publishing handle for background logic.

use beacon_proto::NotificationEvent;

use crate::bus::{Delivery, NotificationBus};

/// Publishes status events onto a [`NotificationBus`].
///
/// Hand one of these to anything that reports completion or failure, instead
/// of reaching for a process-wide global.
#[derive(Debug, Clone)]
pub struct Notifier {
	bus: NotificationBus,
}

impl Notifier {
	/// Creates a notifier publishing to `bus`.
	pub fn new(bus: NotificationBus) -> Self {
		Self { bus }
	}

	/// Publishes `{success, message}` to the current subscriber, if any.
	pub fn notify(&self, success: bool, message: impl Into<String>) -> Delivery {
		self.bus.publish(&NotificationEvent::new(success, message))
	}

	/// Shorthand for `notify(true, message)`.
	pub fn success(&self, message: impl Into<String>) -> Delivery {
		self.notify(true, message)
	}

	/// Shorthand for `notify(false, message)`.
	pub fn failure(&self, message: impl Into<String>) -> Delivery {
		self.notify(false, message)
	}
}
