//! System clipboard access for click-to-copy.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a clipboard write.
#[derive(Debug, Error)]
pub enum ClipboardError {
	/// No clipboard could be opened (no display server, sandboxed, ...).
	#[error("clipboard unavailable: {0}")]
	Unavailable(String),

	/// The clipboard rejected the text.
	#[error("clipboard write failed: {0}")]
	Write(String),

	/// The blocking clipboard task panicked or was cancelled.
	#[error("clipboard task failed: {0}")]
	Task(#[from] tokio::task::JoinError),
}

/// Result of a click-to-copy, as reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
	/// Text is on the clipboard.
	Copied,
	/// The write failed; the reason was logged.
	Failed,
}

/// Writes text to a clipboard.
///
/// Copies run on their own task, concurrently with each other and with the
/// toast runtime, so implementations are shared behind an `Arc`.
#[async_trait]
pub trait ClipboardBridge: Send + Sync {
	/// Places `text` on the clipboard.
	///
	/// # Errors
	///
	/// Returns [`ClipboardError`] when the clipboard cannot be opened or written.
	async fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

#[async_trait]
impl<C: ClipboardBridge + ?Sized> ClipboardBridge for Box<C> {
	async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
		(**self).copy(text).await
	}
}

/// Copies `text` and folds the result into a [`CopyOutcome`], logging failures.
pub async fn copy_and_report<C: ClipboardBridge + ?Sized>(clipboard: &C, text: &str) -> CopyOutcome {
	match clipboard.copy(text).await {
		Ok(()) => {
			tracing::debug!(len = text.len(), "clipboard.copied");
			CopyOutcome::Copied
		}
		Err(error) => {
			tracing::warn!(%error, "clipboard.copy_failed");
			CopyOutcome::Failed
		}
	}
}

/// The desktop clipboard via `arboard`.
///
/// A fresh handle is opened per copy on the blocking pool; some platforms
/// tie clipboard ownership to the opening thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardBridge for SystemClipboard {
	async fn copy(&self, text: &str) -> Result<(), ClipboardError> {
		let text = text.to_owned();
		tokio::task::spawn_blocking(move || {
			let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
			clipboard.set_text(text).map_err(|e| ClipboardError::Write(e.to_string()))
		})
		.await?
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::ScriptedClipboard;

	#[tokio::test(flavor = "current_thread")]
	async fn report_maps_results() {
		let ok = ScriptedClipboard::succeeding();
		assert_eq!(copy_and_report(&ok, "hello").await, CopyOutcome::Copied);
		assert_eq!(ok.copied(), vec!["hello".to_owned()]);

		let failing = ScriptedClipboard::failing();
		assert_eq!(copy_and_report(&failing, "hello").await, CopyOutcome::Failed);
		assert!(failing.copied().is_empty());
	}

	#[tokio::test(flavor = "current_thread")]
	async fn boxed_bridge_delegates() {
		let inner = ScriptedClipboard::succeeding();
		let boxed: Box<dyn ClipboardBridge> = Box::new(inner.clone());
		boxed.copy("boxed").await.unwrap();
		assert_eq!(inner.copied(), vec!["boxed".to_owned()]);
	}
}
