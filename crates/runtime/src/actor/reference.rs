// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::{Any, type_name},
	fmt,
	sync::Arc,
};

use tracing::warn;

use crate::{
	actor::{ActorId, Context, cell::ActorCell, mailbox::Admission, traits::Actor},
	message::{Body, Message, MessageType},
	pool::PoolId,
};

/// Shared handle to an actor.
///
/// Cloning is cheap. The actor lives as long as the longest holder: the
/// framework registry, any clone of this handle, and transiently the pool's
/// ready queue. Holding a handle does not keep a stopped actor running.
#[derive(Clone)]
pub struct ActorRef {
	cell: Arc<ActorCell>,
}

impl ActorRef {
	pub(crate) fn new(cell: ActorCell) -> Self {
		Self {
			cell: Arc::new(cell),
		}
	}

	pub(crate) fn cell(&self) -> &ActorCell {
		&self.cell
	}

	pub fn id(&self) -> ActorId {
		self.cell.id()
	}

	pub fn pool_id(&self) -> PoolId {
		self.cell.pool().id()
	}

	/// Rust type name of the actor behind this handle.
	pub fn type_name(&self) -> &'static str {
		self.cell.type_name()
	}

	/// Sends `message` to this actor. Callable from any thread.
	///
	/// Returns the mailbox size right after the push, or 0 if the actor is
	/// stopped (the message is dropped). The count is informational: it may
	/// be stale by the time the caller reads it.
	pub fn enqueue(&self, message: Message) -> usize {
		match self.cell.mailbox.push(message) {
			Admission::Rejected => 0,
			Admission::Ready(pending) => {
				self.cell.pool().notify_ready(self.clone());
				pending
			}
			Admission::Queued(pending) => {
				self.cell.pool().notify();
				pending
			}
		}
	}

	pub fn send<M: MessageType>(&self, message: M) -> usize {
		self.enqueue(Message::new(message))
	}

	/// Sends `message` with `reply_to` as the reply target.
	pub fn send_with_reply<M: MessageType>(&self, message: M, reply_to: &ActorRef) -> usize {
		self.enqueue(Message::with_reply_to(message, reply_to))
	}

	/// Runs `f` on this actor's worker thread, in mailbox order.
	pub fn enqueue_fn<F>(&self, f: F) -> usize
	where
		F: FnOnce(&ActorRef) + Send + 'static,
	{
		self.enqueue(Message::system(Body::Invoke(Box::new(move |_: &mut dyn Any, ctx: &Context| {
			f(ctx.actor())
		}))))
	}

	/// Runs `f` against the actor's own state on its worker thread.
	///
	/// If the actor is not an `A`, the closure is dropped without running.
	pub fn invoke<A, F>(&self, f: F) -> usize
	where
		A: Actor,
		F: FnOnce(&mut A, &Context) + Send + 'static,
	{
		self.enqueue(Message::system(Body::Invoke(Box::new(move |actor: &mut dyn Any, ctx: &Context| {
			match actor.downcast_mut::<A>() {
				Some(actor) => f(actor, ctx),
				None => warn!(
					actor = %ctx.id(),
					expected = type_name::<A>(),
					"Invoke target has a different actor type, dropping"
				),
			}
		}))))
	}

	/// Racy mailbox size, for statistics and load balancing only.
	pub fn pending(&self) -> usize {
		self.cell.mailbox.pending()
	}

	pub fn is_stopped(&self) -> bool {
		self.cell.mailbox.is_stopped()
	}

	/// Whether both handles point at the same actor instance.
	pub fn ptr_eq(&self, other: &ActorRef) -> bool {
		Arc::ptr_eq(&self.cell, &other.cell)
	}
}

impl PartialEq for ActorRef {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for ActorRef {}

impl fmt::Debug for ActorRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActorRef")
			.field("id", &self.id())
			.field("type", &self.type_name())
			.field("pool", &self.pool_id())
			.field("pending", &self.pending())
			.finish()
	}
}
