// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Unbounded multi-producer, multi-consumer FIFO used as a pool's ready queue.
//!
//! The queue is a singly linked list with a permanent dummy head. Producers
//! serialize on the tail region and consumers serialize on the head region;
//! the two regions are independent so one producer and one consumer proceed
//! in parallel. Both regions are guarded by a [`SpinLock`].
//!
//! # Invariant
//!
//! Every critical section is O(1) pointer work and never calls back into
//! application code. That bounds how long any spinner can wait and is the
//! only reason busy-waiting is acceptable here. Allocation and freeing of
//! nodes happen outside the regions.

use std::{
	marker::PhantomData,
	ptr::{self, NonNull},
	sync::atomic::{AtomicPtr, Ordering},
};

use crossbeam_utils::CachePadded;

use crate::sync::SpinLock;

struct Node<T> {
	/// `None` for the dummy head, and for a node whose value was taken.
	value: Option<T>,
	next: AtomicPtr<Node<T>>,
}

impl<T> Node<T> {
	fn alloc(value: Option<T>) -> NonNull<Node<T>> {
		let node = Box::new(Node {
			value,
			next: AtomicPtr::new(ptr::null_mut()),
		});
		NonNull::from(Box::leak(node))
	}
}

/// Concurrent FIFO with separate producer and consumer exclusion regions.
pub struct ReadyQueue<T> {
	/// Consumer side: the current dummy node.
	head: CachePadded<SpinLock<NonNull<Node<T>>>>,
	/// Producer side: the last node in the list.
	tail: CachePadded<SpinLock<NonNull<Node<T>>>>,
	_owns: PhantomData<Box<Node<T>>>,
}

// SAFETY: nodes are only reached through `head` and `tail`, each behind its
// own lock; values are moved in by producers and out by consumers.
unsafe impl<T: Send> Send for ReadyQueue<T> {}
unsafe impl<T: Send> Sync for ReadyQueue<T> {}

impl<T> ReadyQueue<T> {
	pub fn new() -> Self {
		let dummy = Node::alloc(None);
		Self {
			head: CachePadded::new(SpinLock::new(dummy)),
			tail: CachePadded::new(SpinLock::new(dummy)),
			_owns: PhantomData,
		}
	}

	/// Appends `value` at the logical tail. Callable from any thread.
	pub fn produce(&self, value: T) {
		let node = Node::alloc(Some(value));

		let mut tail = self.tail.lock();
		// SAFETY: `*tail` is alive: the consumer never frees the last node.
		unsafe { (*tail.as_ptr()).next.store(node.as_ptr(), Ordering::Release) };
		*tail = node;
	}

	/// Removes and returns the logical head, or `None` when empty.
	///
	/// An empty queue is left untouched.
	pub fn consume(&self) -> Option<T> {
		let mut head = self.head.lock();
		let first = *head;

		// SAFETY: `first` is the dummy and owned by the consumer side.
		let next = NonNull::new(unsafe { (*first.as_ptr()).next.load(Ordering::Acquire) })?;

		// SAFETY: `next` was published with release ordering and its value
		// is only ever touched by the consumer holding `head`.
		let value = unsafe { (*next.as_ptr()).value.take() };
		*head = next;
		drop(head);

		// SAFETY: `first` is unreachable now. It cannot be the tail since
		// `next` follows it, so no producer still refers to it.
		drop(unsafe { Box::from_raw(first.as_ptr()) });

		value
	}

	/// Racy emptiness check, for diagnostics only.
	pub fn is_empty(&self) -> bool {
		let head = self.head.lock();
		// SAFETY: see `consume`.
		unsafe { (*head.as_ptr()).next.load(Ordering::Acquire).is_null() }
	}

	/// Consumes every queued value.
	pub fn drain(&self) -> Vec<T> {
		let mut drained = Vec::new();
		while let Some(value) = self.consume() {
			drained.push(value);
		}
		drained
	}
}

impl<T> Default for ReadyQueue<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Drop for ReadyQueue<T> {
	fn drop(&mut self) {
		let mut current = self.head.get_mut().as_ptr();
		while !current.is_null() {
			// SAFETY: `&mut self` gives exclusive access to every node.
			let node = unsafe { Box::from_raw(current) };
			current = node.next.load(Ordering::Relaxed);
		}
	}
}
