// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-pool message dispatch table.
//!
//! Each actor type registered with a pool contributes its [`Routes`]; the
//! pool flattens them into one table keyed by (actor type, message kind),
//! built once when the pool is created and read-only afterwards.

use std::{
	any::{Any, TypeId, type_name},
	collections::HashMap,
	marker::PhantomData,
};

use tracing::warn;

use crate::{
	actor::{Actor, Context, Handler},
	message::{Message, MessageKind, MessageType},
};

pub(crate) type HandlerFn = fn(&mut dyn Any, Message, &Context);

/// The message types an actor type handles, in registration order.
pub struct Routes<A> {
	entries: Vec<(MessageKind, HandlerFn)>,
	_actor: PhantomData<fn(A)>,
}

impl<A: Actor> Routes<A> {
	fn new() -> Self {
		Self {
			entries: Vec::new(),
			_actor: PhantomData,
		}
	}

	/// Route messages of type `M` to `A`'s [`Handler<M>`].
	///
	/// If two routes share a kind the first one registered wins.
	pub fn on<M>(&mut self) -> &mut Self
	where
		A: Handler<M>,
		M: MessageType,
	{
		self.entries.push((M::KIND, deliver::<A, M>));
		self
	}
}

fn deliver<A, M>(actor: &mut dyn Any, message: Message, ctx: &Context)
where
	A: Handler<M>,
	M: MessageType,
{
	let Some(actor) = actor.downcast_mut::<A>() else {
		warn!(actor = %ctx.id(), expected = type_name::<A>(), "Actor type mismatch in dispatch table");
		return;
	};
	match message.downcast::<M>() {
		Ok(message) => actor.on_message(message, ctx),
		Err(message) => warn!(
			actor = %ctx.id(),
			kind = %message.kind(),
			expected = type_name::<M>(),
			"Message payload does not match its kind, dropping"
		),
	}
}

#[derive(Default)]
pub(crate) struct DispatchTable {
	handlers: HashMap<(TypeId, MessageKind), HandlerFn>,
	actors: HashMap<TypeId, &'static str>,
}

impl DispatchTable {
	pub(crate) fn register<A: Actor>(&mut self) {
		let actor = TypeId::of::<A>();
		if self.actors.insert(actor, type_name::<A>()).is_some() {
			return;
		}

		let mut routes = Routes::<A>::new();
		A::routes(&mut routes);
		for (kind, handler) in routes.entries {
			self.handlers.entry((actor, kind)).or_insert(handler);
		}
	}

	pub(crate) fn lookup(&self, actor: TypeId, kind: MessageKind) -> Option<HandlerFn> {
		self.handlers.get(&(actor, kind)).copied()
	}

	pub(crate) fn accepts(&self, actor: TypeId) -> bool {
		self.actors.contains_key(&actor)
	}

	pub(crate) fn actor_types(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.actors.values().copied()
	}
}
