// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{env, process::Command, thread, time::Duration};

use hive_runtime::{Actor, Context, Framework, Handler, MessageKind, MessageType, PoolBuilder, PoolId, Routes};
use hive_testing::logging;

const CHILD_ENV: &str = "HIVE_RUNTIME_PANIC_CHILD";

struct Explode;

impl MessageType for Explode {
	const KIND: MessageKind = MessageKind::new(1);
}

struct Fragile;

impl Actor for Fragile {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<Explode>();
	}
}

impl Handler<Explode> for Fragile {
	fn on_message(&mut self, _msg: Explode, _ctx: &Context) {
		panic!("fragile actor exploded");
	}
}

/// Runs inside the child process; only returns if the panic did not abort.
fn panic_in_handler() {
	logging::init();
	let framework = Framework::new().unwrap();
	let pool = framework.create_pool(PoolBuilder::new(PoolId(1)).threads(1).actor::<Fragile>()).unwrap();
	let actor = framework.create_actor(pool, Fragile).unwrap();

	actor.send(Explode);
	thread::sleep(Duration::from_secs(5));
	framework.shutdown().unwrap();
}

#[test]
fn test_handler_panic_aborts_process() {
	if env::var_os(CHILD_ENV).is_some() {
		panic_in_handler();
		return;
	}

	let status = Command::new(env::current_exe().unwrap())
		.args(["test_handler_panic_aborts_process", "--exact", "--nocapture", "--test-threads=1"])
		.env(CHILD_ENV, "1")
		.status()
		.unwrap();

	assert!(!status.success(), "child exited with {:?}", status);

	#[cfg(unix)]
	{
		use std::os::unix::process::ExitStatusExt;
		assert_eq!(status.signal(), Some(6), "child exited with {:?}", status);
	}
}
