// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Core actor traits.
//!
//! - [`Actor`]: lifecycle hooks and the list of handled message types
//! - [`Handler`]: one implementation per handled message type

use std::any::Any;

use crate::{
	actor::context::Context,
	message::MessageType,
	pool::dispatch::Routes,
	timer::TimerId,
};

/// The core actor abstraction.
///
/// Actors are isolated units of state that:
/// - Own their state exclusively (no shared mutable state)
/// - Process messages one at a time, never concurrently with themselves
/// - Communicate with other actors only via message passing
///
/// # Lifecycle
///
/// 1. `on_start()` - runs once, synchronously, when the actor is created
/// 2. `on_message()` / `on_timer()` - one call per mailbox message
/// 3. `on_exit()` - runs once when the actor is stopped or the framework
///    shuts down
///
/// # Example
///
/// ```ignore
/// struct Counter {
///     count: i64,
/// }
///
/// struct Increment;
///
/// impl MessageType for Increment {
///     const KIND: MessageKind = MessageKind::new(1);
/// }
///
/// impl Actor for Counter {
///     fn routes(routes: &mut Routes<Self>) {
///         routes.on::<Increment>();
///     }
/// }
///
/// impl Handler<Increment> for Counter {
///     fn on_message(&mut self, _msg: Increment, _ctx: &Context) {
///         self.count += 1;
///     }
/// }
/// ```
pub trait Actor: Send + Sized + 'static {
	/// Register the message types this actor handles.
	///
	/// Called once per pool the actor type is registered with. Kinds that
	/// are not registered are dropped when they reach the actor.
	#[allow(unused_variables)]
	fn routes(routes: &mut Routes<Self>) {}

	/// Called once, on the creating thread, before `create_actor` returns.
	///
	/// This is the place to set timers or send the first messages.
	#[allow(unused_variables)]
	fn on_start(&mut self, ctx: &Context) {}

	/// Called exactly once when the actor is stopped or the framework shuts
	/// down.
	#[allow(unused_variables)]
	fn on_exit(&mut self, ctx: &Context) {}

	/// Called on the actor's worker thread when a timer set with
	/// [`Framework::set_timer_for`](crate::Framework::set_timer_for) fires.
	#[allow(unused_variables)]
	fn on_timer(&mut self, timer: TimerId, ctx: &Context) {}
}

/// Handles messages of type `M`.
///
/// Handlers must not panic: a panic escaping a handler terminates the
/// process.
pub trait Handler<M: MessageType>: Actor {
	fn on_message(&mut self, msg: M, ctx: &Context);
}

/// Object-safe view of an [`Actor`] used by the worker loop.
pub(crate) trait ErasedActor: Send {
	fn as_any_mut(&mut self) -> &mut dyn Any;

	fn start(&mut self, ctx: &Context);

	fn exit(&mut self, ctx: &Context);

	fn timer(&mut self, timer: TimerId, ctx: &Context);
}

impl<A: Actor> ErasedActor for A {
	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn start(&mut self, ctx: &Context) {
		self.on_start(ctx);
	}

	fn exit(&mut self, ctx: &Context) {
		self.on_exit(ctx);
	}

	fn timer(&mut self, timer: TimerId, ctx: &Context) {
		self.on_timer(timer, ctx);
	}
}
