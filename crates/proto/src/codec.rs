//! Text-frame encoding.
//!
//! One frame is one JSON object on one line. The transport layer owns line
//! splitting; these helpers only map between a single line and an event.

use thiserror::Error;

use crate::NotificationEvent;

/// Upper bound on a single frame, excluding the trailing newline.
///
/// Events are small; anything larger is treated as a malformed frame.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Errors produced while encoding or decoding a frame.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtoError {
	/// The frame is not a valid `{"success": bool, "message": string}` object.
	#[error("malformed frame: {0}")]
	Malformed(#[from] serde_json::Error),

	/// The frame exceeds [`MAX_FRAME_LEN`].
	#[error("frame of {0} bytes exceeds limit of {max} bytes", max = MAX_FRAME_LEN)]
	TooLong(usize),
}

/// Serializes an event into a single-line frame (without the newline).
///
/// # Errors
///
/// Returns [`ProtoError::TooLong`] if the encoded frame exceeds [`MAX_FRAME_LEN`].
pub fn encode_frame(event: &NotificationEvent) -> Result<String, ProtoError> {
	let frame = serde_json::to_string(event)?;
	if frame.len() > MAX_FRAME_LEN {
		return Err(ProtoError::TooLong(frame.len()));
	}
	Ok(frame)
}

/// Parses a single frame into an event.
///
/// Surrounding whitespace (including a stray `\r`) is ignored. Unknown fields
/// are ignored; missing or mistyped fields are rejected.
///
/// # Errors
///
/// Returns [`ProtoError`] if the frame is too long or not a valid event.
pub fn decode_frame(frame: &str) -> Result<NotificationEvent, ProtoError> {
	if frame.len() > MAX_FRAME_LEN {
		return Err(ProtoError::TooLong(frame.len()));
	}
	Ok(serde_json::from_str(frame.trim())?)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn encodes_the_exact_wire_shape() {
		let frame = encode_frame(&NotificationEvent::success("OK")).unwrap();
		assert_eq!(frame, r#"{"success":true,"message":"OK"}"#);
		assert!(!frame.contains('\n'));
	}

	#[test]
	fn newlines_in_messages_stay_escaped() {
		let frame = encode_frame(&NotificationEvent::failure("line one\nline two")).unwrap();
		assert!(!frame.contains('\n'));
		assert_eq!(
			decode_frame(&frame).unwrap(),
			NotificationEvent::failure("line one\nline two")
		);
	}

	#[test]
	fn decode_tolerates_whitespace_and_unknown_fields() {
		let event = decode_frame("  {\"message\":\"hi\",\"success\":false,\"extra\":1}\r").unwrap();
		assert_eq!(event, NotificationEvent::failure("hi"));
	}

	#[test]
	fn decode_rejects_wrong_shapes() {
		for frame in [
			"",
			"not json",
			"[]",
			r#"{"success":true}"#,
			r#"{"message":"x"}"#,
			r#"{"success":"yes","message":"x"}"#,
			r#"{"success":true,"message":42}"#,
		] {
			assert!(
				matches!(decode_frame(frame), Err(ProtoError::Malformed(_))),
				"frame {frame:?} should be rejected"
			);
		}
	}

	#[test]
	fn oversized_frames_are_rejected_both_ways() {
		let event = NotificationEvent::success("x".repeat(MAX_FRAME_LEN));
		assert!(matches!(encode_frame(&event), Err(ProtoError::TooLong(_))));

		let frame = " ".repeat(MAX_FRAME_LEN + 1);
		assert!(matches!(decode_frame(&frame), Err(ProtoError::TooLong(n)) if n == MAX_FRAME_LEN + 1));
	}
}
