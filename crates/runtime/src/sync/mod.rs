// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Synchronization primitives used by the scheduler.

pub mod spin;

pub use spin::{SpinGuard, SpinLock};
