// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Worker pools.
//!
//! A pool owns a fixed set of worker threads and one ready queue of actors
//! with pending work. Workers take an actor, run exactly one of its messages
//! and put it back if more are waiting (see [`worker`]).

use std::{
	any::TypeId,
	fmt,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread::{self, JoinHandle},
};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, trace};

use crate::{
	actor::ActorRef,
	config::PoolConfig,
	error::{Error, Result},
	framework::WeakFramework,
	queue::ReadyQueue,
};

pub mod builder;
pub mod dispatch;
pub(crate) mod worker;

pub use builder::PoolBuilder;
pub use dispatch::Routes;
use dispatch::DispatchTable;

/// Application-chosen pool identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolId(pub u32);

impl fmt::Display for PoolId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

pub(crate) struct Pool {
	id: PoolId,
	name: String,
	quit: AtomicBool,
	ready: ReadyQueue<ActorRef>,
	/// Only taken when a worker observed the ready queue empty.
	wake: Mutex<()>,
	available: Condvar,
	dispatch: DispatchTable,
	workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Pool {
	fn new(id: PoolId, name: String, dispatch: DispatchTable) -> Self {
		Self {
			id,
			name,
			quit: AtomicBool::new(false),
			ready: ReadyQueue::new(),
			wake: Mutex::new(()),
			available: Condvar::new(),
			dispatch,
			workers: Mutex::new(Vec::new()),
		}
	}

	/// Creates the pool and spawns its workers.
	pub(crate) fn start(config: PoolConfig, dispatch: DispatchTable, framework: WeakFramework) -> Result<Arc<Pool>> {
		let pool = Arc::new(Pool::new(config.id, config.name, dispatch));

		for index in 0..config.threads {
			let worker_pool = pool.clone();
			let worker_framework = framework.clone();
			let spawned = thread::Builder::new()
				.name(format!("{}-{}", pool.name, index))
				.spawn(move || worker::run(worker_pool, worker_framework));

			match spawned {
				Ok(handle) => pool.workers.lock().push(handle),
				Err(err) => {
					error!(pool = %pool.id, index, error = %err, "Failed to spawn pool worker");
					pool.shutdown();
					return Err(Error::Spawn(err));
				}
			}
		}

		debug!(pool = %pool.id, name = %pool.name, threads = config.threads, "Pool started");
		Ok(pool)
	}

	pub(crate) fn id(&self) -> PoolId {
		self.id
	}

	pub(crate) fn dispatch(&self) -> &DispatchTable {
		&self.dispatch
	}

	pub(crate) fn accepts(&self, actor: TypeId) -> bool {
		self.dispatch.accepts(actor)
	}

	pub(crate) fn is_quitting(&self) -> bool {
		self.quit.load(Ordering::Acquire)
	}

	/// Admits `actor` to the ready queue and wakes one idle worker.
	///
	/// Dropped once the pool is quitting, so the queue cannot hold actors
	/// (and through them the pool itself) past shutdown.
	pub(crate) fn notify_ready(&self, actor: ActorRef) {
		if self.is_quitting() {
			return;
		}
		self.ready.produce(actor);
		let _wake = self.wake.lock();
		self.available.notify_one();
	}

	/// Wakes one idle worker without admitting anything.
	pub(crate) fn notify(&self) {
		self.available.notify_one();
	}

	/// Next ready actor, blocking while the queue is empty.
	///
	/// Returns `None` on quit or on a wake that found nothing to do.
	pub(crate) fn next_ready(&self) -> Option<ActorRef> {
		if let Some(actor) = self.ready.consume() {
			return Some(actor);
		}

		let mut wake = self.wake.lock();
		if let Some(actor) = self.ready.consume() {
			return Some(actor);
		}
		if self.is_quitting() {
			return None;
		}
		self.available.wait(&mut wake);
		None
	}

	/// Sets the quit flag and wakes every worker, without joining.
	pub(crate) fn request_quit(&self) {
		self.quit.store(true, Ordering::Release);
		let _wake = self.wake.lock();
		self.available.notify_all();
	}

	/// Stops the workers, joins them and releases every queued actor.
	///
	/// A worker inside a handler finishes that one message first.
	pub(crate) fn shutdown(&self) {
		self.request_quit();

		let workers = std::mem::take(&mut *self.workers.lock());
		for worker in workers {
			if worker.join().is_err() {
				error!(pool = %self.id, "Pool worker terminated abnormally");
			}
		}

		self.release_ready();
		debug!(pool = %self.id, "Pool shut down");
	}

	/// Empties the ready queue. Only meaningful once quitting.
	pub(crate) fn release_ready(&self) {
		let released = self.ready.drain().len();
		if released > 0 {
			trace!(pool = %self.id, released, "Released ready actors");
		}
	}
}

impl fmt::Debug for Pool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pool")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("quit", &self.is_quitting())
			.field("actor_types", &self.dispatch.actor_types().collect::<Vec<_>>())
			.finish()
	}
}
