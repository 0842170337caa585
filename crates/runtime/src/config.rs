// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Runtime configuration.
//!
//! - [`FrameworkConfig`]: process-wide settings, including the timer actor
//! - [`PoolConfig`]: per-pool thread settings

use std::time::Duration;

use crate::pool::PoolId;

/// Reserved id of the pool that runs the timer actor.
pub const POOL_ID_INTERNAL: PoolId = PoolId(1 << 31);

/// Default sleep between two timer ticks.
pub const DEFAULT_TIMER_TICK: Duration = Duration::from_millis(10);

/// Configuration for a [`Framework`](crate::Framework).
#[derive(Debug, Clone)]
pub struct FrameworkConfig {
	/// Granularity of the timer actor. Timer periods must be a multiple.
	///
	/// Default: 10ms
	pub timer_tick: Duration,

	/// Pool id the timer actor is registered under.
	///
	/// Default: [`POOL_ID_INTERNAL`]
	pub timer_pool: PoolId,
}

impl Default for FrameworkConfig {
	fn default() -> Self {
		Self {
			timer_tick: DEFAULT_TIMER_TICK,
			timer_pool: POOL_ID_INTERNAL,
		}
	}
}

impl FrameworkConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the timer tick. Zero is clamped to one millisecond.
	pub fn timer_tick(mut self, tick: Duration) -> Self {
		self.timer_tick = tick.max(Duration::from_millis(1));
		self
	}

	pub fn timer_pool(mut self, id: PoolId) -> Self {
		self.timer_pool = id;
		self
	}
}

/// Configuration for a worker pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
	pub id: PoolId,

	/// Number of worker threads, at least one.
	///
	/// Default: number of logical CPUs
	pub threads: usize,

	/// Worker threads are named `{name}-{index}`.
	///
	/// Default: `pool-{id}`
	pub name: String,
}

impl PoolConfig {
	pub fn new(id: PoolId) -> Self {
		Self {
			id,
			threads: num_cpus::get().max(1),
			name: format!("pool-{}", id),
		}
	}

	pub fn threads(mut self, threads: usize) -> Self {
		self.threads = threads.max(1);
		self
	}

	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}
}

/// Returns whether `period` is a whole number of `tick`s.
pub(crate) fn is_tick_multiple(period: Duration, tick: Duration) -> bool {
	let tick = tick.as_nanos();
	tick != 0 && period.as_nanos() % tick == 0
}
