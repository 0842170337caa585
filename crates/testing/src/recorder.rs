// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Thread-safe event log for observing actors from a test.

use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable append-only log. Clones share the same events.
#[derive(Debug)]
pub struct Recorder<T> {
	events: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
	fn clone(&self) -> Self {
		Self {
			events: self.events.clone(),
		}
	}
}

impl<T> Default for Recorder<T> {
	fn default() -> Self {
		Self {
			events: Arc::new(Mutex::new(Vec::new())),
		}
	}
}

impl<T> Recorder<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&self, event: T) {
		self.events.lock().push(event);
	}

	pub fn len(&self) -> usize {
		self.events.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.lock().is_empty()
	}
}

impl<T: Clone> Recorder<T> {
	pub fn events(&self) -> Vec<T> {
		self.events.lock().clone()
	}
}
