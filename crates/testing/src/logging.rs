// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Tracing output for tests.

use tracing_subscriber::EnvFilter;

/// Installs a test-captured fmt subscriber, filtered by `RUST_LOG`
/// (default `warn`). Safe to call from every test.
pub fn init() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}
