// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Actor runtime with shared worker pools.
//!
//! Actors are grouped into pools. Each pool runs a fixed number of OS
//! threads that share one ready queue; an actor is on that queue only while
//! it has work and is not already running, so every actor handles its
//! messages one at a time and in order. Timers are served by an internal
//! actor on a dedicated single-thread pool.

pub mod actor;
pub mod config;
pub mod error;
pub mod framework;
pub mod group;
pub mod message;
pub mod pool;
pub mod queue;
pub mod sync;
pub mod timer;

pub use actor::{Actor, ActorId, ActorRef, Context, Handler};
pub use config::{FrameworkConfig, POOL_ID_INTERNAL, PoolConfig};
pub use error::{Error, Result};
pub use framework::Framework;
pub use group::{broadcast, broadcast_fn, find_any};
pub use message::{Message, MessageKind, MessageType};
pub use pool::{PoolBuilder, PoolId, Routes};
pub use timer::TimerId;
