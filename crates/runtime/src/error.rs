// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{io, time::Duration};

use crate::pool::PoolId;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the runtime's caller-facing API.
///
/// Delivery-time races (enqueue to a stopped actor, cancelling an unknown
/// timer, a timer firing for a removed actor) are never reported here; they
/// are silent no-ops.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("pool {0} is not registered")]
	UnknownPool(PoolId),

	#[error("pool {0} is already registered")]
	DuplicatePool(PoolId),

	#[error("timer period {period:?} is not a multiple of the timer tick {tick:?}")]
	InvalidTimerPeriod {
		period: Duration,
		tick: Duration,
	},

	#[error("the framework has been shut down")]
	ShutDown,

	#[error("shutdown cannot be requested from a pool worker or an actor hook")]
	ShutdownFromWorker,

	#[error("failed to spawn worker thread: {0}")]
	Spawn(#[from] io::Error),
}

