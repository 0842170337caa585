// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{
	actor::Actor,
	config::PoolConfig,
	pool::{PoolId, dispatch::DispatchTable},
};

/// Describes a pool to create with [`Framework::create_pool`](crate::Framework::create_pool).
///
/// ```ignore
/// let pool = framework.create_pool(
///     PoolBuilder::new(PoolId(1)).threads(2).actor::<Ping>().actor::<Pong>(),
/// )?;
/// ```
pub struct PoolBuilder {
	pub(crate) config: PoolConfig,
	pub(crate) dispatch: DispatchTable,
}

impl PoolBuilder {
	pub fn new(id: PoolId) -> Self {
		Self::with_config(PoolConfig::new(id))
	}

	pub fn with_config(config: PoolConfig) -> Self {
		Self {
			config,
			dispatch: DispatchTable::default(),
		}
	}

	pub fn threads(mut self, threads: usize) -> Self {
		self.config = self.config.threads(threads);
		self
	}

	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.config = self.config.name(name);
		self
	}

	/// Registers an actor type and the message kinds it routes.
	pub fn actor<A: Actor>(mut self) -> Self {
		self.dispatch.register::<A>();
		self
	}

	pub fn id(&self) -> PoolId {
		self.config.id
	}
}
