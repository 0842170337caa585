// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Busy-wait mutual exclusion.
//!
//! A [`SpinLock`] acquires by compare-and-swap on a single boolean, with no
//! backoff and no parking. It is only correct to use where the guarded
//! section is a handful of pointer or collection operations and never runs
//! application code: a holder cannot be descheduled for long, so waiters
//! spin for a bounded number of retries.

use std::{
	cell::UnsafeCell,
	hint,
	ops::{Deref, DerefMut},
	sync::atomic::{AtomicBool, Ordering},
};

/// A compare-and-swap spin lock protecting a value.
pub struct SpinLock<T> {
	locked: AtomicBool,
	value: UnsafeCell<T>,
}

// SAFETY: access to `value` is serialized by `locked`.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
	pub const fn new(value: T) -> Self {
		Self {
			locked: AtomicBool::new(false),
			value: UnsafeCell::new(value),
		}
	}

	/// Spins until the lock is acquired.
	#[inline]
	pub fn lock(&self) -> SpinGuard<'_, T> {
		while self.locked.compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed).is_err() {
			while self.locked.load(Ordering::Relaxed) {
				hint::spin_loop();
			}
		}
		SpinGuard {
			lock: self,
		}
	}

	/// Acquires the lock if it is free.
	#[inline]
	pub fn try_lock(&self) -> Option<SpinGuard<'_, T>> {
		self.locked.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed).ok().map(|_| SpinGuard {
			lock: self,
		})
	}

	pub fn get_mut(&mut self) -> &mut T {
		self.value.get_mut()
	}

	pub fn into_inner(self) -> T {
		self.value.into_inner()
	}
}

impl<T: Default> Default for SpinLock<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T> std::fmt::Debug for SpinLock<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpinLock").field("locked", &self.locked.load(Ordering::Relaxed)).finish_non_exhaustive()
	}
}

/// RAII guard; the lock is released on drop.
pub struct SpinGuard<'a, T> {
	lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinGuard<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		// SAFETY: the guard proves exclusive access.
		unsafe { &*self.lock.value.get() }
	}
}

impl<T> DerefMut for SpinGuard<'_, T> {
	fn deref_mut(&mut self) -> &mut T {
		// SAFETY: the guard proves exclusive access.
		unsafe { &mut *self.lock.value.get() }
	}
}

impl<T> Drop for SpinGuard<'_, T> {
	fn drop(&mut self) {
		self.lock.locked.store(false, Ordering::Release);
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use super::*;

	#[test]
	fn test_try_lock_fails_while_held() {
		let lock = SpinLock::new(0);
		let guard = lock.lock();
		assert!(lock.try_lock().is_none());
		drop(guard);
		assert!(lock.try_lock().is_some());
	}

	#[test]
	fn test_concurrent_increments() {
		let lock = Arc::new(SpinLock::new(0usize));
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let lock = lock.clone();
				thread::spawn(move || {
					for _ in 0..10_000 {
						*lock.lock() += 1;
					}
				})
			})
			.collect();

		for handle in handles {
			handle.join().unwrap();
		}

		assert_eq!(*lock.lock(), 40_000);
	}
}
