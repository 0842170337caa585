// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Messages exchanged between actors.
//!
//! Every message carries a [`MessageKind`] tag used for dispatch and an
//! optional reply-to actor id. Application kinds live below
//! [`MessageKind::SYSTEM_START`]; the range above it is reserved for the
//! runtime's own control messages (timer tick/set/cancel/fire and function
//! invocation).

use std::{any::Any, fmt};

use crate::{
	actor::{ActorId, ActorRef, Context},
	timer::{TimerEntry, TimerId},
};

/// Discriminant identifying a message's type for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageKind(u32);

impl MessageKind {
	/// First value of the reserved range.
	pub const SYSTEM_START: u32 = 1 << 31;

	pub const TIMER_TICK: MessageKind = MessageKind(Self::SYSTEM_START + 1);
	pub const TIMER_SET: MessageKind = MessageKind(Self::SYSTEM_START + 2);
	pub const TIMER_FIRE: MessageKind = MessageKind(Self::SYSTEM_START + 3);
	pub const TIMER_CANCEL: MessageKind = MessageKind(Self::SYSTEM_START + 4);
	pub const FUNCTION_INVOKE: MessageKind = MessageKind(Self::SYSTEM_START + 5);

	/// An application kind. Panics (at compile time in const context) if
	/// `value` falls in the reserved range.
	pub const fn new(value: u32) -> Self {
		assert!(value < Self::SYSTEM_START, "message kind collides with the reserved system range");
		Self(value)
	}

	pub const fn value(self) -> u32 {
		self.0
	}

	pub const fn is_system(self) -> bool {
		self.0 >= Self::SYSTEM_START
	}
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::TIMER_TICK => f.write_str("timer-tick"),
			Self::TIMER_SET => f.write_str("timer-set"),
			Self::TIMER_FIRE => f.write_str("timer-fire"),
			Self::TIMER_CANCEL => f.write_str("timer-cancel"),
			Self::FUNCTION_INVOKE => f.write_str("function-invoke"),
			MessageKind(value) => write!(f, "{}", value),
		}
	}
}

/// An application message type.
///
/// ```ignore
/// struct Ping(String);
///
/// impl MessageType for Ping {
///     const KIND: MessageKind = MessageKind::new(1);
/// }
/// ```
pub trait MessageType: Send + 'static {
	const KIND: MessageKind;
}

pub(crate) type InvokeFn = Box<dyn FnOnce(&mut dyn Any, &Context) + Send>;

pub(crate) enum Body {
	User(Box<dyn Any + Send>),
	TimerTick,
	SetTimer(TimerEntry),
	CancelTimer(TimerId),
	OnTimer(TimerId),
	Invoke(InvokeFn),
}

/// The unit of communication between actors.
///
/// Ownership moves from the producer into the target's mailbox on enqueue,
/// then to the worker that dispatches it.
pub struct Message {
	kind: MessageKind,
	reply_to: Option<ActorId>,
	body: Body,
}

impl Message {
	pub fn new<M: MessageType>(message: M) -> Self {
		Self {
			kind: M::KIND,
			reply_to: None,
			body: Body::User(Box::new(message)),
		}
	}

	/// A message whose handler can answer `reply_to`.
	///
	/// Only the id is kept: the reply target is looked up when the handler
	/// asks for it, and a stopped target simply resolves to nothing.
	pub fn with_reply_to<M: MessageType>(message: M, reply_to: &ActorRef) -> Self {
		Self {
			reply_to: Some(reply_to.id()),
			..Self::new(message)
		}
	}

	pub(crate) fn system(body: Body) -> Self {
		let kind = match &body {
			Body::TimerTick => MessageKind::TIMER_TICK,
			Body::SetTimer(_) => MessageKind::TIMER_SET,
			Body::CancelTimer(_) => MessageKind::TIMER_CANCEL,
			Body::OnTimer(_) => MessageKind::TIMER_FIRE,
			Body::Invoke(_) => MessageKind::FUNCTION_INVOKE,
			Body::User(_) => unreachable!("user messages are built with Message::new"),
		};
		Self {
			kind,
			reply_to: None,
			body,
		}
	}

	pub fn kind(&self) -> MessageKind {
		self.kind
	}

	pub fn reply_to(&self) -> Option<ActorId> {
		self.reply_to
	}

	/// Whether this message carries an `M`.
	pub fn is<M: MessageType>(&self) -> bool {
		self.kind == M::KIND && matches!(&self.body, Body::User(payload) if payload.is::<M>())
	}

	/// Takes the payload out as an `M`, or gives the message back.
	pub fn downcast<M: MessageType>(self) -> Result<M, Message> {
		if !self.is::<M>() {
			return Err(self);
		}
		match self.body {
			Body::User(payload) => match payload.downcast::<M>() {
				Ok(message) => Ok(*message),
				Err(_) => unreachable!("payload type checked above"),
			},
			_ => unreachable!("payload type checked above"),
		}
	}

	pub(crate) fn into_body(self) -> Body {
		self.body
	}
}

impl fmt::Debug for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Message").field("kind", &self.kind).field("reply_to", &self.reply_to).finish_non_exhaustive()
	}
}
