//! The notification payload.

use serde::{Deserialize, Serialize};

/// Messages longer than this many characters are classified as overflow.
pub const OVERFLOW_THRESHOLD: usize = 50;

/// A transient status event pushed from background logic to the presentation side.
///
/// Immutable once received. `success` selects a presentation variant only and
/// never affects timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
	/// Whether the reported operation succeeded.
	pub success: bool,
	/// Human-readable status text. This is also what a toast click copies.
	pub message: String,
}

impl NotificationEvent {
	/// Creates a new event.
	pub fn new(success: bool, message: impl Into<String>) -> Self {
		Self {
			success,
			message: message.into(),
		}
	}

	/// Creates a success event.
	pub fn success(message: impl Into<String>) -> Self {
		Self::new(true, message)
	}

	/// Creates a failure event.
	pub fn failure(message: impl Into<String>) -> Self {
		Self::new(false, message)
	}

	/// Returns true when the message exceeds [`OVERFLOW_THRESHOLD`] characters.
	///
	/// Length is counted in Unicode scalar values, so a 50-character message
	/// of multi-byte text is still not overflow.
	#[must_use]
	pub fn is_overflow(&self) -> bool {
		self.message.chars().count() > OVERFLOW_THRESHOLD
	}
}
