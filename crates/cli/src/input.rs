//! Line-oriented stdin commands.

use beacon_proto::{NotificationEvent, ProtoError, decode_frame};
use beacon_toast::{Point, PointerEvent, ToastId};
use thiserror::Error;

/// Errors parsing a stdin line.
#[derive(Debug, Error)]
pub enum InputError {
	/// The first word is not a known command.
	#[error("unknown command {0:?}")]
	UnknownCommand(String),

	/// A pointer command lacks a valid toast number.
	#[error("expected a toast number, got {0:?}")]
	BadToastId(String),

	/// A raw JSON frame failed to decode.
	#[error(transparent)]
	Frame(#[from] ProtoError),
}

/// Parses a `serve` input line into an event.
///
/// Accepts `ok <message>`, `fail <message>`, or a raw JSON frame. Blank lines yield `None`.
pub fn parse_event(line: &str) -> Result<Option<NotificationEvent>, InputError> {
	let line = line.trim();
	if line.is_empty() {
		return Ok(None);
	}
	if line.starts_with('{') {
		return Ok(Some(decode_frame(line)?));
	}

	let (verb, message) = split_verb(line);
	let success = match verb {
		"ok" | "success" => true,
		"fail" | "failure" | "err" => false,
		other => return Err(InputError::UnknownCommand(other.to_owned())),
	};
	Ok(Some(NotificationEvent::new(success, message)))
}

/// Parses a `listen` input line into pointer input for a toast.
///
/// Accepts `hover <n>`, `leave <n>`, and `copy <n>`, where `n` is the number
/// printed next to the toast. Blank lines yield `None`.
pub fn parse_pointer(line: &str) -> Result<Option<(ToastId, PointerEvent)>, InputError> {
	let line = line.trim();
	if line.is_empty() {
		return Ok(None);
	}

	let (verb, rest) = split_verb(line);
	let id = rest
		.trim_start_matches('#')
		.parse()
		.map(ToastId)
		.map_err(|_| InputError::BadToastId(rest.to_owned()))?;
	let at = Point::default();
	let event = match verb {
		"hover" | "enter" => PointerEvent::Enter { at },
		"leave" => PointerEvent::Leave,
		"copy" | "click" => PointerEvent::Click { at },
		other => return Err(InputError::UnknownCommand(other.to_owned())),
	};
	Ok(Some((id, event)))
}

fn split_verb(line: &str) -> (&str, &str) {
	match line.split_once(char::is_whitespace) {
		Some((verb, rest)) => (verb, rest.trim_start()),
		None => (line, ""),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn event_verbs() {
		assert_eq!(parse_event("ok build finished").unwrap(), Some(NotificationEvent::success("build finished")));
		assert_eq!(parse_event("fail   2 tests failed ").unwrap(), Some(NotificationEvent::failure("2 tests failed")));
		assert_eq!(parse_event("ok").unwrap(), Some(NotificationEvent::success("")));
		assert_eq!(parse_event("   ").unwrap(), None);
	}

	#[test]
	fn raw_frames_are_accepted() {
		let event = parse_event(r#"{"success":false,"message":"raw"}"#).unwrap();
		assert_eq!(event, Some(NotificationEvent::failure("raw")));
		assert!(matches!(parse_event("{broken"), Err(InputError::Frame(_))));
	}

	#[test]
	fn unknown_event_verb() {
		assert!(matches!(parse_event("maybe hi"), Err(InputError::UnknownCommand(v)) if v == "maybe"));
	}

	#[test]
	fn pointer_commands() {
		assert_eq!(
			parse_pointer("copy 3").unwrap(),
			Some((ToastId(3), PointerEvent::Click { at: Point::default() }))
		);
		assert_eq!(
			parse_pointer("hover #2").unwrap(),
			Some((ToastId(2), PointerEvent::Enter { at: Point::default() }))
		);
		assert_eq!(parse_pointer("leave 2").unwrap(), Some((ToastId(2), PointerEvent::Leave)));
		assert!(matches!(parse_pointer("copy x"), Err(InputError::BadToastId(_))));
		assert!(matches!(parse_pointer("poke 1"), Err(InputError::UnknownCommand(_))));
	}
}
