// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared helpers for runtime tests.

pub mod logging;
pub mod recorder;
pub mod util;

pub use recorder::Recorder;
pub use util::wait::{wait_for, wait_for_condition};
