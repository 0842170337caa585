// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::{TypeId, type_name},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use parking_lot::Mutex;

use crate::{
	actor::{
		ActorId, ActorRef, Context,
		mailbox::{Mailbox, Requeue},
		traits::{Actor, ErasedActor},
	},
	message::Message,
	pool::{Pool, worker::Executing},
};

/// Shared state behind an [`ActorRef`].
pub(crate) struct ActorCell {
	id: ActorId,
	type_id: TypeId,
	type_name: &'static str,
	pool: Arc<Pool>,
	pub(crate) mailbox: Mailbox,
	/// Only the worker executing the actor (or a lifecycle hook) locks this,
	/// so it is uncontended in steady state.
	pub(crate) behavior: Mutex<Box<dyn ErasedActor>>,
	stop_requested: AtomicBool,
	exited: AtomicBool,
}

impl ActorCell {
	pub(crate) fn new<A: Actor>(id: ActorId, pool: Arc<Pool>, actor: A) -> Self {
		Self {
			id,
			type_id: TypeId::of::<A>(),
			type_name: type_name::<A>(),
			pool,
			mailbox: Mailbox::new(),
			behavior: Mutex::new(Box::new(actor)),
			stop_requested: AtomicBool::new(false),
			exited: AtomicBool::new(false),
		}
	}

	pub(crate) fn id(&self) -> ActorId {
		self.id
	}

	pub(crate) fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub(crate) fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub(crate) fn pool(&self) -> &Arc<Pool> {
		&self.pool
	}

	pub(crate) fn request_stop(&self) {
		self.stop_requested.store(true, Ordering::SeqCst);
	}

	pub(crate) fn stop_requested(&self) -> bool {
		self.stop_requested.load(Ordering::SeqCst)
	}

	/// Runs the exit hook (at most once over the actor's life), then sets
	/// the stopped flag. The caller holds the behavior lock.
	pub(crate) fn complete_stop_locked(&self, behavior: &mut dyn ErasedActor, ctx: &Context) {
		if !self.exited.swap(true, Ordering::AcqRel) {
			let _executing = Executing::enter(self.id);
			behavior.exit(ctx);
		}
		self.mailbox.stop();
	}

	/// Completes a requested stop, waiting for a running handler to return.
	pub(crate) fn complete_stop(&self, ctx: &Context) {
		let mut behavior = self.behavior.lock();
		self.complete_stop_locked(&mut **behavior, ctx);
	}

	/// Completes a requested stop unless the actor is running. A running
	/// actor's worker completes it after the current handler returns.
	pub(crate) fn try_complete_stop(&self, ctx: &Context) {
		if !self.stop_requested() {
			return;
		}
		if let Some(mut behavior) = self.behavior.try_lock() {
			self.complete_stop_locked(&mut **behavior, ctx);
		}
	}
}

/// Operations reserved to the pool that services an actor.
pub(crate) trait Schedule {
	/// Moves the head message out for execution, leaving its slot queued.
	fn peek_head(&self) -> Option<Message>;

	/// Releases the slot of the executed message and re-admits the actor
	/// when work remains.
	fn finalize_and_maybe_requeue(self) -> Requeue;
}

impl Schedule for ActorRef {
	fn peek_head(&self) -> Option<Message> {
		self.cell().mailbox.peek_head()
	}

	fn finalize_and_maybe_requeue(self) -> Requeue {
		let requeue = self.cell().mailbox.finish_head();
		if requeue == Requeue::Pending {
			let pool = self.cell().pool().clone();
			pool.notify_ready(self);
		}
		requeue
	}
}
