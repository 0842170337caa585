// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Actor execution context.
//!
//! The context provides a running actor with access to:
//! - Its own reference, to hand to other actors
//! - The framework, for creating actors and looking them up
//! - The reply target of the message being handled
//! - Timer scheduling and self-stop

use std::time::Duration;

use crate::{
	actor::{ActorId, ActorRef},
	error::Result,
	framework::Framework,
	message::{Message, MessageType},
	timer::TimerId,
};

/// Context handed to every actor hook and handler.
#[derive(Clone)]
pub struct Context {
	actor: ActorRef,
	framework: Framework,
	reply_to: Option<ActorId>,
}

impl Context {
	pub(crate) fn new(actor: ActorRef, framework: Framework, reply_to: Option<ActorId>) -> Self {
		Self {
			actor,
			framework,
			reply_to,
		}
	}

	/// Id of the running actor.
	pub fn id(&self) -> ActorId {
		self.actor.id()
	}

	/// Reference to the running actor.
	pub fn actor(&self) -> &ActorRef {
		&self.actor
	}

	/// Get a reference to send messages to self.
	pub fn self_ref(&self) -> ActorRef {
		self.actor.clone()
	}

	pub fn framework(&self) -> &Framework {
		&self.framework
	}

	/// Id of the actor the current message asked to be answered.
	pub fn reply_to_id(&self) -> Option<ActorId> {
		self.reply_to
	}

	/// Resolves the reply target through the registry.
	///
	/// `None` if the message carried no reply target or the target has been
	/// stopped since.
	pub fn reply_to(&self) -> Option<ActorRef> {
		self.reply_to.and_then(|id| self.framework.get_actor(id))
	}

	/// Sends `message` to the reply target, with this actor as its own reply
	/// target. Returns the target's pending count, or 0 if there is none.
	pub fn reply<M: MessageType>(&self, message: M) -> usize {
		match self.reply_to() {
			Some(target) => target.enqueue(Message::with_reply_to(message, &self.actor)),
			None => 0,
		}
	}

	/// Stops this actor once the current handler returns.
	pub fn stop(&self) {
		self.framework.stop_actor(&self.actor);
	}

	/// Schedules [`Actor::on_timer`](crate::Actor::on_timer) on this actor.
	pub fn set_timer(&self, period: Duration, repeat: bool) -> Result<TimerId> {
		self.framework.set_timer_for(&self.actor, period, repeat)
	}

	pub fn cancel_timer(&self, timer: TimerId) {
		self.framework.cancel_timer(timer);
	}
}
