// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The framework: registry of pools and actors, and entry point for timers.
//!
//! A [`Framework`] is an explicit handle, cheap to clone and passed to every
//! actor through its [`Context`]. Construction starts the internal timer pool
//! and its [`TimerActor`]; [`Framework::shutdown`] stops everything.

use std::{
	any::{TypeId, type_name},
	collections::HashMap,
	fmt,
	sync::{
		Arc, OnceLock, Weak,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
	time::Duration,
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
	actor::{Actor, ActorId, ActorRef, Context, cell::ActorCell, next_actor_id},
	config::{FrameworkConfig, PoolConfig, is_tick_multiple},
	error::{Error, Result},
	message::{Body, Message},
	pool::{
		Pool, PoolBuilder, PoolId,
		worker::{self, Executing},
	},
	timer::{TimerActor, TimerEntry, TimerId},
};

#[derive(Default)]
struct Registry {
	actors: HashMap<ActorId, ActorRef>,
	pools: HashMap<PoolId, Arc<Pool>>,
}

struct FrameworkInner {
	config: FrameworkConfig,
	registry: Mutex<Registry>,
	timer_actor: OnceLock<ActorRef>,
	next_timer_id: AtomicU64,
	shut_down: AtomicBool,
}

impl Drop for FrameworkInner {
	fn drop(&mut self) {
		// Workers exit on their own; joining here could run on a worker.
		for pool in self.registry.get_mut().pools.values() {
			pool.request_quit();
		}
	}
}

/// Handle to a running actor framework.
///
/// # Example
///
/// ```ignore
/// let framework = Framework::new()?;
/// let pool = framework.create_pool(PoolBuilder::new(PoolId(1)).threads(2).actor::<Counter>())?;
/// let counter = framework.create_actor(pool, Counter::default())?;
/// counter.send(Increment);
/// framework.shutdown()?;
/// ```
#[derive(Clone)]
pub struct Framework {
	inner: Arc<FrameworkInner>,
}

/// Non-owning handle held by worker threads.
#[derive(Clone)]
pub(crate) struct WeakFramework {
	inner: Weak<FrameworkInner>,
}

impl WeakFramework {
	pub(crate) fn upgrade(&self) -> Option<Framework> {
		self.inner.upgrade().map(|inner| Framework {
			inner,
		})
	}
}

impl Framework {
	/// Creates a framework with the default configuration.
	pub fn new() -> Result<Self> {
		Self::with_config(FrameworkConfig::default())
	}

	pub fn with_config(config: FrameworkConfig) -> Result<Self> {
		let tick = config.timer_tick;
		let timer_pool = config.timer_pool;

		let framework = Self {
			inner: Arc::new(FrameworkInner {
				config,
				registry: Mutex::new(Registry::default()),
				timer_actor: OnceLock::new(),
				next_timer_id: AtomicU64::new(1),
				shut_down: AtomicBool::new(false),
			}),
		};

		let pool = PoolBuilder::with_config(PoolConfig::new(timer_pool).threads(1).name("timer")).actor::<TimerActor>();
		framework.create_pool(pool)?;
		let timers = framework.create_actor(timer_pool, TimerActor::new(tick))?;
		let _ = framework.inner.timer_actor.set(timers);

		debug!(timer_pool = %timer_pool, tick = ?tick, "Framework started");
		Ok(framework)
	}

	fn downgrade(&self) -> WeakFramework {
		WeakFramework {
			inner: Arc::downgrade(&self.inner),
		}
	}

	pub fn config(&self) -> &FrameworkConfig {
		&self.inner.config
	}

	pub fn is_shut_down(&self) -> bool {
		self.inner.shut_down.load(Ordering::Acquire)
	}

	fn ensure_running(&self) -> Result<()> {
		if self.is_shut_down() {
			return Err(Error::ShutDown);
		}
		Ok(())
	}

	/// Creates a pool and starts its worker threads.
	pub fn create_pool(&self, builder: PoolBuilder) -> Result<PoolId> {
		self.ensure_running()?;

		let id = builder.id();
		if self.get_pool(id).is_some() {
			return Err(Error::DuplicatePool(id));
		}

		let pool = Pool::start(builder.config, builder.dispatch, self.downgrade())?;
		self.add_pool(pool)?;
		Ok(id)
	}

	/// Creates an actor on `pool` and runs its start hook before returning.
	pub fn create_actor<A: Actor>(&self, pool: PoolId, actor: A) -> Result<ActorRef> {
		self.ensure_running()?;

		let pool = self.get_pool(pool).ok_or(Error::UnknownPool(pool))?;
		if !pool.accepts(TypeId::of::<A>()) {
			warn!(
				pool = %pool.id(),
				actor = type_name::<A>(),
				"Actor type not registered with pool, its messages will be dropped"
			);
		}

		let actor = ActorRef::new(ActorCell::new(next_actor_id(), pool, actor));
		self.add_actor(actor.clone());
		self.start_actor(&actor);
		Ok(actor)
	}

	fn start_actor(&self, actor: &ActorRef) {
		let cell = actor.cell();
		let ctx = Context::new(actor.clone(), self.clone(), None);

		{
			let mut behavior = cell.behavior.lock();
			{
				let _executing = Executing::enter(actor.id());
				behavior.start(&ctx);
			}
			if cell.stop_requested() {
				cell.complete_stop_locked(&mut **behavior, &ctx);
			}
		}

		// A stop requested by a worker while the start hook held the lock.
		cell.try_complete_stop(&ctx);
	}

	pub(crate) fn add_actor(&self, actor: ActorRef) {
		self.inner.registry.lock().actors.insert(actor.id(), actor);
	}

	pub(crate) fn add_pool(&self, pool: Arc<Pool>) -> Result<()> {
		let mut registry = self.inner.registry.lock();
		if registry.pools.contains_key(&pool.id()) {
			drop(registry);
			pool.shutdown();
			return Err(Error::DuplicatePool(pool.id()));
		}
		registry.pools.insert(pool.id(), pool);
		Ok(())
	}

	/// Looks up a live actor. Stopped actors are no longer registered.
	pub fn get_actor(&self, id: ActorId) -> Option<ActorRef> {
		self.inner.registry.lock().actors.get(&id).cloned()
	}

	pub(crate) fn get_pool(&self, id: PoolId) -> Option<Arc<Pool>> {
		self.inner.registry.lock().pools.get(&id).cloned()
	}

	pub fn has_pool(&self, id: PoolId) -> bool {
		self.get_pool(id).is_some()
	}

	/// Number of registered actors, the timer actor included.
	pub fn actor_count(&self) -> usize {
		self.inner.registry.lock().actors.len()
	}

	/// Stops `actor`: it leaves the registry, its exit hook runs and its
	/// mailbox rejects every later message.
	///
	/// If the actor is currently executing, the stop completes as soon as its
	/// handler returns. Messages still queued are never delivered.
	pub fn stop_actor(&self, actor: &ActorRef) {
		let cell = actor.cell();
		cell.request_stop();
		self.inner.registry.lock().actors.remove(&actor.id());
		debug!(actor = %actor.id(), "Stopping actor");

		if worker::current_actor() == Some(actor.id()) {
			return;
		}

		let ctx = Context::new(actor.clone(), self.clone(), None);
		if worker::in_worker() {
			cell.try_complete_stop(&ctx);
		} else {
			cell.complete_stop(&ctx);
		}
	}

	/// Stops every pool and actor. Blocks until all workers are joined.
	///
	/// Calling it again is a no-op. It cannot be called from a pool worker
	/// nor from an actor hook running on any other thread.
	pub fn shutdown(&self) -> Result<()> {
		if worker::in_worker() || worker::current_actor().is_some() {
			return Err(Error::ShutdownFromWorker);
		}
		if self.inner.shut_down.swap(true, Ordering::AcqRel) {
			return Ok(());
		}

		let (pools, actors) = {
			let registry = self.inner.registry.lock();
			(
				registry.pools.values().cloned().collect::<Vec<_>>(),
				registry.actors.values().cloned().collect::<Vec<_>>(),
			)
		};

		for pool in &pools {
			pool.shutdown();
		}

		for actor in &actors {
			let cell = actor.cell();
			cell.request_stop();
			cell.complete_stop(&Context::new(actor.clone(), self.clone(), None));
		}

		{
			let mut registry = self.inner.registry.lock();
			registry.actors.clear();
			registry.pools.clear();
		}

		info!(pools = pools.len(), actors = actors.len(), "Framework shut down");
		Ok(())
	}

	/// Runs `callback` on the timer thread after `period`, and every `period`
	/// after that if `repeat` is set.
	///
	/// `period` must be a multiple of the configured timer tick. The callback
	/// shares the timer thread with every other timer and must be short.
	pub fn set_timer<F>(&self, period: Duration, repeat: bool, callback: F) -> Result<TimerId>
	where
		F: FnMut(TimerId) + Send + 'static,
	{
		self.ensure_running()?;

		let tick = self.inner.config.timer_tick;
		if !is_tick_multiple(period, tick) {
			return Err(Error::InvalidTimerPeriod {
				period,
				tick,
			});
		}

		let id = TimerId(self.inner.next_timer_id.fetch_add(1, Ordering::Relaxed));
		if let Some(timers) = self.inner.timer_actor.get() {
			timers.enqueue(Message::system(Body::SetTimer(TimerEntry::new(id, period, repeat, Box::new(callback)))));
		}
		debug!(timer = %id, period = ?period, repeat, "Timer set");
		Ok(id)
	}

	/// Delivers [`Actor::on_timer`] to `actor`, on its own worker thread.
	///
	/// Only the actor's id is captured: once the actor is stopped the timer
	/// keeps firing into nothing until cancelled.
	pub fn set_timer_for(&self, actor: &ActorRef, period: Duration, repeat: bool) -> Result<TimerId> {
		let target = actor.id();
		let framework = self.downgrade();
		self.set_timer(period, repeat, move |timer| {
			if let Some(actor) = framework.upgrade().and_then(|framework| framework.get_actor(target)) {
				actor.enqueue(Message::system(Body::OnTimer(timer)));
			}
		})
	}

	/// Cancels a timer. Unknown or already fired ids are ignored.
	pub fn cancel_timer(&self, timer: TimerId) {
		if let Some(timers) = self.inner.timer_actor.get() {
			timers.enqueue(Message::system(Body::CancelTimer(timer)));
		}
	}
}

impl fmt::Debug for Framework {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let registry = self.inner.registry.lock();
		f.debug_struct("Framework")
			.field("pools", &registry.pools.keys().collect::<Vec<_>>())
			.field("actors", &registry.actors.len())
			.field("shut_down", &self.is_shut_down())
			.finish()
	}
}
