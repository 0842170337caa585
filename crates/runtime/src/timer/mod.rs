// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Timers.
//!
//! All timers of a framework are owned by one [`TimerActor`] running on the
//! internal timer pool. Setting or cancelling a timer is a message to that
//! actor, so the timer table itself is never shared.

use std::{fmt, time::Duration};

mod actor;

pub(crate) use actor::TimerActor;

/// Identity of a scheduled timer, unique within a framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

pub(crate) type TimerCallback = Box<dyn FnMut(TimerId) + Send>;

/// A scheduled callback.
pub(crate) struct TimerEntry {
	pub(crate) id: TimerId,
	pub(crate) period: Duration,
	pub(crate) repeat: bool,
	pub(crate) callback: TimerCallback,
}

impl TimerEntry {
	pub(crate) fn new(id: TimerId, period: Duration, repeat: bool, callback: TimerCallback) -> Self {
		Self {
			id,
			period,
			repeat,
			callback,
		}
	}

	fn fire(&mut self) {
		(self.callback)(self.id);
	}
}

impl fmt::Debug for TimerEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TimerEntry")
			.field("id", &self.id)
			.field("period", &self.period)
			.field("repeat", &self.repeat)
			.finish_non_exhaustive()
	}
}
