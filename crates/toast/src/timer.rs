//! Individually cancellable timers with generation-checked fires.

use std::future::poll_fn;
use std::time::Duration;

use tokio_util::time::DelayQueue;
use tokio_util::time::delay_queue::Key;

/// Handle to one scheduled timer.
///
/// Owners keep it in an `Option` slot. Cancelling takes it out of the slot,
/// and a fire only counts if its generation matches the handle still held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerHandle {
	key: Key,
	generation: u64,
}

impl TimerHandle {
	/// Returns the generation stamped on this timer.
	pub const fn generation(&self) -> u64 {
		self.generation
	}
}

/// A timer that reached its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
	/// Value given to [`Timers::schedule`].
	pub payload: T,
	generation: u64,
}

impl<T> Fired<T> {
	/// Returns the generation of the timer that fired.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when `slot` still holds the handle this fire belongs to.
	pub fn is_current(&self, slot: &Option<TimerHandle>) -> bool {
		slot.as_ref().is_some_and(|handle| handle.generation == self.generation)
	}
}

#[derive(Debug)]
struct Entry<T> {
	payload: T,
	generation: u64,
}

/// Queue of pending timers polled by a single consumer.
///
/// Fires are only observed through [`Timers::expired`], so whoever polls the
/// queue is the only place timer callbacks run.
#[derive(Debug)]
pub struct Timers<T> {
	queue: DelayQueue<Entry<T>>,
	next_generation: u64,
}

impl<T> Default for Timers<T> {
	fn default() -> Self {
		Self {
			queue: DelayQueue::new(),
			next_generation: 0,
		}
	}
}

impl<T> Timers<T> {
	/// Creates an empty timer queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules `payload` to fire after `after`.
	pub fn schedule(&mut self, payload: T, after: Duration) -> TimerHandle {
		self.next_generation = self.next_generation.wrapping_add(1);
		let generation = self.next_generation;
		let key = self.queue.insert(Entry { payload, generation }, after);
		TimerHandle { key, generation }
	}

	/// Cancels the timer held in `slot` and clears the slot.
	///
	/// Returns true if a pending timer was removed. An empty slot is a no-op.
	/// A handle whose timer already fired must have been taken from its slot
	/// when the fire was handled; queue keys are recycled.
	pub fn cancel(&mut self, slot: &mut Option<TimerHandle>) -> bool {
		let Some(handle) = slot.take() else {
			return false;
		};
		match self.queue.try_remove(&handle.key) {
			Some(expired) => {
				debug_assert_eq!(expired.get_ref().generation, handle.generation);
				true
			}
			None => false,
		}
	}

	/// Number of pending timers.
	pub fn len(&self) -> usize {
		self.queue.len()
	}

	/// Returns true when nothing is scheduled.
	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	/// Waits for the next timer to fire.
	///
	/// Resolves to `None` immediately when the queue is empty; callers that
	/// select over several sources should guard on [`Timers::is_empty`].
	pub async fn expired(&mut self) -> Option<Fired<T>> {
		let expired = poll_fn(|cx| self.queue.poll_expired(cx)).await?;
		let Entry { payload, generation } = expired.into_inner();
		Some(Fired { payload, generation })
	}
}

#[cfg(test)]
mod tests {
	use tokio::time::Instant;

	use super::*;

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn fires_in_deadline_order() {
		let mut timers = Timers::new();
		timers.schedule("late", Duration::from_millis(30));
		timers.schedule("early", Duration::from_millis(10));

		let start = Instant::now();
		assert_eq!(timers.expired().await.map(|f| f.payload), Some("early"));
		let early = start.elapsed();
		assert_eq!(timers.expired().await.map(|f| f.payload), Some("late"));
		let late = start.elapsed();

		assert!(early >= Duration::from_millis(10) && early < Duration::from_millis(12), "{early:?}");
		assert!(late >= Duration::from_millis(30) && late < Duration::from_millis(32), "{late:?}");
		assert!(timers.expired().await.is_none());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn cancel_clears_slot_and_prevents_fire() {
		let mut timers = Timers::new();
		let mut slot = Some(timers.schedule(1, Duration::from_millis(10)));
		timers.schedule(2, Duration::from_millis(20));

		assert!(timers.cancel(&mut slot));
		assert!(slot.is_none());
		assert!(!timers.cancel(&mut slot), "second cancel is a no-op");

		assert_eq!(timers.expired().await.map(|f| f.payload), Some(2));
		assert!(timers.is_empty());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn fire_is_current_only_for_the_armed_handle() {
		let mut timers = Timers::new();
		let first = timers.schedule((), Duration::from_millis(5));
		let second = timers.schedule((), Duration::from_millis(50));
		assert_ne!(first.generation(), second.generation());

		let fired = timers.expired().await.unwrap();
		assert!(fired.is_current(&Some(first)));
		assert!(!fired.is_current(&Some(second)));
		assert!(!fired.is_current(&None));
	}
}
