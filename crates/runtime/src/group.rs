// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Helpers over groups of actors.

use crate::{actor::ActorRef, message::MessageType};

/// Picks the actor with the fewest pending messages, stopping early at an
/// idle one. Uses the racy pending count, so the choice is a hint.
pub fn find_any<'a, I>(actors: I) -> Option<&'a ActorRef>
where
	I: IntoIterator<Item = &'a ActorRef>,
{
	let mut least: Option<(&ActorRef, usize)> = None;
	for actor in actors {
		let pending = actor.pending();
		if pending == 0 {
			return Some(actor);
		}
		if least.is_none_or(|(_, min)| pending < min) {
			least = Some((actor, pending));
		}
	}
	least.map(|(actor, _)| actor)
}

/// Sends a message built by `make` to every actor. Returns how many
/// accepted it.
pub fn broadcast<'a, I, M, F>(actors: I, mut make: F) -> usize
where
	I: IntoIterator<Item = &'a ActorRef>,
	M: MessageType,
	F: FnMut() -> M,
{
	actors.into_iter().filter(|actor| actor.send(make()) > 0).count()
}

/// Runs a clone of `f` on every actor's own worker thread. Returns how many
/// accepted it.
pub fn broadcast_fn<'a, I, F>(actors: I, f: F) -> usize
where
	I: IntoIterator<Item = &'a ActorRef>,
	F: Fn(&ActorRef) + Clone + Send + 'static,
{
	actors.into_iter().filter(|actor| actor.enqueue_fn(f.clone()) > 0).count()
}
