// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Actors, their mailboxes and the handles used to reach them.

use std::{
	fmt,
	sync::atomic::{AtomicU32, Ordering},
};

pub(crate) mod cell;
pub mod context;
pub(crate) mod mailbox;
pub mod reference;
pub mod traits;

pub use context::Context;
pub use reference::ActorRef;
pub use traits::{Actor, Handler};

/// Process-wide unique actor identity, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

static ACTOR_ID_COUNTER: AtomicU32 = AtomicU32::new(1);

pub(crate) fn next_actor_id() -> ActorId {
	ActorId(ACTOR_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}
