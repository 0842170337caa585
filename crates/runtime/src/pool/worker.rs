// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Pool worker loop.
//!
//! Each worker repeatedly:
//! 1. Takes a ready actor from the pool (blocking while there is none)
//! 2. Moves the head message out of its mailbox
//! 3. Dispatches it under the actor's behavior lock
//! 4. Releases the message slot, re-admitting the actor if work remains
//!
//! A panic escaping a handler is fatal for the whole process.

use std::{
	any::Any,
	cell::Cell,
	panic::{AssertUnwindSafe, catch_unwind},
	process,
	sync::Arc,
};

use tracing::{debug, error, trace, warn};

use crate::{
	actor::{ActorId, ActorRef, Context, cell::Schedule, traits::ErasedActor},
	framework::{Framework, WeakFramework},
	message::{Body, Message},
	pool::{Pool, PoolId},
	timer::TimerActor,
};

thread_local! {
	static WORKER_POOL: Cell<Option<PoolId>> = const { Cell::new(None) };
	static EXECUTING: Cell<Option<ActorId>> = const { Cell::new(None) };
}

/// Whether the calling thread is a pool worker.
pub(crate) fn in_worker() -> bool {
	WORKER_POOL.with(Cell::get).is_some()
}

/// The actor whose hook or handler is running on the calling thread.
pub(crate) fn current_actor() -> Option<ActorId> {
	EXECUTING.with(Cell::get)
}

/// Marks an actor as executing on this thread until dropped.
pub(crate) struct Executing {
	previous: Option<ActorId>,
}

impl Executing {
	pub(crate) fn enter(actor: ActorId) -> Self {
		Self {
			previous: EXECUTING.with(|executing| executing.replace(Some(actor))),
		}
	}
}

impl Drop for Executing {
	fn drop(&mut self) {
		EXECUTING.with(|executing| executing.set(self.previous));
	}
}

/// Worker thread entry point.
pub(crate) fn run(pool: Arc<Pool>, framework: WeakFramework) {
	WORKER_POOL.with(|worker| worker.set(Some(pool.id())));
	debug!(pool = %pool.id(), "Worker starting");

	if let Err(panic) = catch_unwind(AssertUnwindSafe(|| run_loop(&pool, &framework))) {
		error!(
			pool = %pool.id(),
			panic = %panic_message(panic.as_ref()),
			"Actor handler panicked, aborting"
		);
		process::abort();
	}

	pool.release_ready();
	debug!(pool = %pool.id(), "Worker stopped");
}

fn run_loop(pool: &Pool, framework: &WeakFramework) {
	while !pool.is_quitting() {
		let Some(actor) = pool.next_ready() else {
			continue;
		};

		if actor.is_stopped() {
			trace!(actor = %actor.id(), "Discarding stopped actor");
			continue;
		}

		let Some(framework) = framework.upgrade() else {
			debug!(pool = %pool.id(), "Framework dropped, worker exiting");
			return;
		};

		let Some(message) = actor.peek_head() else {
			warn!(actor = %actor.id(), "Ready actor has an empty mailbox");
			continue;
		};

		execute(pool, &framework, &actor, message);
		actor.finalize_and_maybe_requeue();
	}
}

fn execute(pool: &Pool, framework: &Framework, actor: &ActorRef, message: Message) {
	let cell = actor.cell();
	let ctx = Context::new(actor.clone(), framework.clone(), message.reply_to());
	let _executing = Executing::enter(actor.id());

	{
		let mut behavior = cell.behavior.lock();
		if cell.stop_requested() {
			cell.complete_stop_locked(&mut **behavior, &ctx);
			return;
		}

		dispatch(pool, &mut **behavior, message, &ctx);

		if cell.stop_requested() {
			cell.complete_stop_locked(&mut **behavior, &ctx);
		}
	}

	// A stop requested by another worker while the lock was held.
	cell.try_complete_stop(&ctx);
}

fn dispatch(pool: &Pool, behavior: &mut dyn ErasedActor, message: Message, ctx: &Context) {
	let kind = message.kind();
	if !kind.is_system() {
		match pool.dispatch().lookup(ctx.actor().cell().type_id(), kind) {
			Some(handler) => handler(behavior.as_any_mut(), message, ctx),
			None => debug!(actor = %ctx.id(), %kind, "No handler for message kind, dropping"),
		}
		return;
	}

	match message.into_body() {
		Body::TimerTick => with_timer_actor(behavior, ctx, |timers| timers.tick(ctx)),
		Body::SetTimer(entry) => with_timer_actor(behavior, ctx, |timers| timers.add(entry)),
		Body::CancelTimer(timer) => with_timer_actor(behavior, ctx, |timers| {
			timers.cancel(timer);
		}),
		Body::OnTimer(timer) => behavior.timer(timer, ctx),
		Body::Invoke(function) => function(behavior.as_any_mut(), ctx),
		Body::User(_) => warn!(actor = %ctx.id(), %kind, "Application payload under a system kind, dropping"),
	}
}

fn with_timer_actor(behavior: &mut dyn ErasedActor, ctx: &Context, f: impl FnOnce(&mut TimerActor)) {
	match behavior.as_any_mut().downcast_mut::<TimerActor>() {
		Some(timers) => f(timers),
		None => warn!(actor = %ctx.id(), "Timer message sent to a non-timer actor, dropping"),
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
	if let Some(message) = panic.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_string()
	}
}
