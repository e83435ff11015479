//! The monitor's single pending-check slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A check waiting to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCheck {
	pub interval: Duration,
	pub deadline: Instant,
	generation: u64,
}

impl ScheduledCheck {
	pub(crate) fn generation(&self) -> u64 {
		self.generation
	}

	/// Time left until the check fires, saturating at zero.
	pub fn remaining(&self) -> Duration {
		self.deadline.saturating_duration_since(Instant::now())
	}
}

#[derive(Debug)]
struct Pending {
	check: ScheduledCheck,
	handle: JoinHandle<()>,
}

/// Holds at most one timer task.
///
/// Arming aborts whatever was pending. A firing task claims the slot with
/// [`disarm`](Self::disarm) before doing any work, so a task that lost the
/// slot to a newer timer exits without polling.
#[derive(Debug, Default)]
pub(crate) struct PollTimer {
	slot: Mutex<Option<Pending>>,
	generations: AtomicU64,
}

impl PollTimer {
	/// Replaces the pending timer with the task built by `spawn`.
	///
	/// `spawn` receives the generation it must later pass to `disarm`.
	pub fn arm(&self, interval: Duration, spawn: impl FnOnce(u64) -> JoinHandle<()>) -> ScheduledCheck {
		let mut slot = self.slot.lock();
		if let Some(previous) = slot.take() {
			previous.handle.abort();
		}

		let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
		let check = ScheduledCheck {
			interval,
			deadline: Instant::now() + interval,
			generation,
		};
		let handle = spawn(generation);
		*slot = Some(Pending { check, handle });
		check
	}

	/// Aborts the pending timer. Returns whether one was pending.
	pub fn cancel(&self) -> bool {
		match self.slot.lock().take() {
			Some(pending) => {
				pending.handle.abort();
				true
			}
			None => false,
		}
	}

	/// Empties the slot if it still holds `generation`, without aborting
	/// the task. Called by the firing task itself.
	pub fn disarm(&self, generation: u64) -> bool {
		let mut slot = self.slot.lock();
		if slot.as_ref().is_some_and(|p| p.check.generation == generation) {
			slot.take();
			true
		} else {
			false
		}
	}

	pub fn pending(&self) -> Option<ScheduledCheck> {
		self.slot.lock().as_ref().map(|p| p.check)
	}
}

impl Drop for PollTimer {
	fn drop(&mut self) {
		self.cancel();
	}
}
