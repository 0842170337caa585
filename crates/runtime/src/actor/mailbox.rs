// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-actor mailbox and its ready-signaling protocol.
//!
//! The mailbox decides, under its spin lock, when the owning actor has to be
//! admitted to the pool's ready queue. Admission happens on exactly two
//! transitions:
//!
//! - an enqueue takes the mailbox from empty to non-empty
//! - a worker finishes a message and work remains (and the actor is not
//!   stopped)
//!
//! While a worker executes a message the head slot stays occupied (its
//! payload is moved out, the slot is not popped), so concurrent enqueues never
//! see an empty mailbox and never re-admit an actor that is already running.
//! An actor is therefore never queued while idle, never queued twice, and
//! never executed by two workers at once.
//!
//! The lock only guards collection operations. Acting on a decision
//! (producing into the ready queue, waking a worker) is left to the caller,
//! outside the lock.

use std::{
	collections::VecDeque,
	sync::atomic::{AtomicUsize, Ordering},
};

use tracing::trace;

use crate::{message::Message, sync::SpinLock};

/// Outcome of [`Mailbox::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
	/// The actor is stopped; the message was dropped.
	Rejected,
	/// Empty to non-empty: the actor must be admitted to the ready queue.
	Ready(usize),
	/// The actor is already ready or running; a wake is enough.
	Queued(usize),
}

/// Outcome of [`Mailbox::finish_head`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Requeue {
	/// More messages remain; the actor must go back on the ready queue.
	Pending,
	Idle,
}

struct State {
	/// `None` marks the head slot whose message is being executed.
	queue: VecDeque<Option<Message>>,
	stopped: bool,
}

pub(crate) struct Mailbox {
	state: SpinLock<State>,
	/// Copy of the queue length, updated under the lock, read outside it.
	pending: AtomicUsize,
}

impl Mailbox {
	pub(crate) fn new() -> Self {
		Self {
			state: SpinLock::new(State {
				queue: VecDeque::new(),
				stopped: false,
			}),
			pending: AtomicUsize::new(0),
		}
	}

	pub(crate) fn push(&self, message: Message) -> Admission {
		let mut state = self.state.lock();
		if state.stopped {
			return Admission::Rejected;
		}

		state.queue.push_back(Some(message));
		let len = state.queue.len();
		self.pending.store(len, Ordering::Relaxed);

		if len == 1 {
			Admission::Ready(len)
		} else {
			Admission::Queued(len)
		}
	}

	/// Moves the head message out, leaving its slot queued.
	pub(crate) fn peek_head(&self) -> Option<Message> {
		self.state.lock().queue.front_mut().and_then(Option::take)
	}

	/// Pops the slot of the message just executed.
	pub(crate) fn finish_head(&self) -> Requeue {
		let mut state = self.state.lock();
		state.queue.pop_front();
		self.pending.store(state.queue.len(), Ordering::Relaxed);

		if !state.stopped && !state.queue.is_empty() {
			Requeue::Pending
		} else {
			Requeue::Idle
		}
	}

	/// One-way: once stopped, every later push is rejected.
	pub(crate) fn stop(&self) {
		self.state.lock().stopped = true;
	}

	pub(crate) fn is_stopped(&self) -> bool {
		self.state.lock().stopped
	}

	/// Racy length, for statistics and load balancing only.
	pub(crate) fn pending(&self) -> usize {
		self.pending.load(Ordering::Relaxed)
	}
}

impl Drop for Mailbox {
	fn drop(&mut self) {
		let state = self.state.get_mut();
		let discarded = state.queue.iter().filter(|slot| slot.is_some()).count();
		if discarded > 0 {
			trace!(discarded, "Discarding undelivered messages");
		}
	}
}
