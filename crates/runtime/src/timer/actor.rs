// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeMap,
	thread,
	time::{Duration, Instant},
};

use tracing::trace;

use crate::{
	actor::{Actor, Context},
	message::{Body, Message},
	timer::{TimerEntry, TimerId},
};

/// Owns every timer of a framework.
///
/// The actor polls: each tick fires what is due, sleeps for one tick and
/// sends itself the next tick, so it stays ready for as long as it lives.
/// Entries sharing an expiry instant fire together, in no particular order.
pub(crate) struct TimerActor {
	timers: BTreeMap<Instant, Vec<TimerEntry>>,
	tick: Duration,
}

impl TimerActor {
	pub(crate) fn new(tick: Duration) -> Self {
		Self {
			timers: BTreeMap::new(),
			tick,
		}
	}

	pub(crate) fn tick(&mut self, ctx: &Context) {
		let fired = self.fire_due(Instant::now());
		if fired > 0 {
			trace!(fired, remaining = self.len(), "Timers fired");
		}

		thread::sleep(self.tick);
		ctx.actor().enqueue(Message::system(Body::TimerTick));
	}

	/// Schedules `entry` one period from now.
	pub(crate) fn add(&mut self, entry: TimerEntry) {
		self.insert(Instant::now() + entry.period, entry);
	}

	fn insert(&mut self, expiry: Instant, entry: TimerEntry) {
		self.timers.entry(expiry).or_default().push(entry);
	}

	/// Fires every entry expiring at or before `now`; repeating entries are
	/// rescheduled one period after `now`. Returns the number fired.
	pub(crate) fn fire_due(&mut self, now: Instant) -> usize {
		let later = self.timers.split_off(&(now + Duration::from_nanos(1)));
		let due = std::mem::replace(&mut self.timers, later);

		let mut fired = 0;
		for mut entry in due.into_values().flatten() {
			entry.fire();
			fired += 1;
			if entry.repeat {
				self.insert(now + entry.period, entry);
			}
		}
		fired
	}

	/// Removes the timer `id`. Unknown or already fired ids are ignored.
	pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
		let found = self
			.timers
			.iter()
			.find_map(|(expiry, entries)| entries.iter().position(|entry| entry.id == id).map(|at| (*expiry, at)));

		let Some((expiry, at)) = found else {
			return false;
		};

		if let Some(entries) = self.timers.get_mut(&expiry) {
			entries.swap_remove(at);
			if entries.is_empty() {
				self.timers.remove(&expiry);
			}
		}
		true
	}

	pub(crate) fn len(&self) -> usize {
		self.timers.values().map(Vec::len).sum()
	}
}

impl Actor for TimerActor {
	fn on_start(&mut self, ctx: &Context) {
		ctx.actor().enqueue(Message::system(Body::TimerTick));
	}

	fn on_exit(&mut self, _ctx: &Context) {
		trace!(dropped = self.len(), "Timer actor exiting");
		self.timers.clear();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	use super::*;

	fn counting(id: u64, period: Duration, repeat: bool, counter: &Arc<AtomicUsize>) -> TimerEntry {
		let counter = counter.clone();
		TimerEntry::new(
			TimerId(id),
			period,
			repeat,
			Box::new(move |_| {
				counter.fetch_add(1, Ordering::SeqCst);
			}),
		)
	}

	#[test]
	fn test_one_shot_fires_once() {
		let mut timers = TimerActor::new(Duration::from_millis(10));
		let fired = Arc::new(AtomicUsize::new(0));
		let start = Instant::now();

		timers.insert(start + Duration::from_millis(20), counting(1, Duration::from_millis(20), false, &fired));

		assert_eq!(timers.fire_due(start + Duration::from_millis(10)), 0);
		assert_eq!(timers.fire_due(start + Duration::from_millis(20)), 1);
		assert_eq!(timers.fire_due(start + Duration::from_millis(100)), 0);
		assert_eq!(fired.load(Ordering::SeqCst), 1);
		assert_eq!(timers.len(), 0);
	}

	#[test]
	fn test_repeating_is_rescheduled() {
		let mut timers = TimerActor::new(Duration::from_millis(10));
		let fired = Arc::new(AtomicUsize::new(0));
		let start = Instant::now();
		let period = Duration::from_millis(50);

		timers.insert(start + period, counting(1, period, true, &fired));

		let mut now = start;
		for _ in 0..20 {
			now += Duration::from_millis(10);
			timers.fire_due(now);
		}

		// 200ms elapsed at 50ms each.
		assert_eq!(fired.load(Ordering::SeqCst), 4);
		assert_eq!(timers.len(), 1);
	}

	#[test]
	fn test_zero_period_fires_once_per_call() {
		let mut timers = TimerActor::new(Duration::from_millis(10));
		let fired = Arc::new(AtomicUsize::new(0));
		let start = Instant::now();

		timers.insert(start, counting(1, Duration::ZERO, true, &fired));

		assert_eq!(timers.fire_due(start), 1);
		assert_eq!(timers.fire_due(start), 1);
		assert_eq!(fired.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_simultaneous_expiry_fires_together() {
		let mut timers = TimerActor::new(Duration::from_millis(10));
		let fired = Arc::new(AtomicUsize::new(0));
		let expiry = Instant::now() + Duration::from_millis(30);

		for id in 1..=3 {
			timers.insert(expiry, counting(id, Duration::from_millis(30), false, &fired));
		}
		assert_eq!(timers.timers.len(), 1);

		assert_eq!(timers.fire_due(expiry), 3);
		assert_eq!(fired.load(Ordering::SeqCst), 3);
	}

	#[test]
	fn test_cancel() {
		let mut timers = TimerActor::new(Duration::from_millis(10));
		let fired = Arc::new(AtomicUsize::new(0));
		let start = Instant::now();
		let expiry = start + Duration::from_millis(10);

		timers.insert(expiry, counting(1, Duration::from_millis(10), false, &fired));
		timers.insert(expiry, counting(2, Duration::from_millis(10), false, &fired));

		assert!(timers.cancel(TimerId(1)));
		assert_eq!(timers.len(), 1);
		assert!(timers.cancel(TimerId(2)));
		assert!(timers.timers.is_empty());

		// Unknown and already cancelled ids are ignored.
		assert!(!timers.cancel(TimerId(2)));
		assert!(!timers.cancel(TimerId(99)));

		assert_eq!(timers.fire_due(start + Duration::from_secs(1)), 0);
		assert_eq!(fired.load(Ordering::SeqCst), 0);
	}
}
