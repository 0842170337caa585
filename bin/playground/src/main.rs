// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{thread::sleep, time::Duration};

use hive_runtime::{
	Actor, ActorRef, Context, Framework, FrameworkConfig, Handler, MessageKind, MessageType, PoolBuilder, PoolId,
	Routes, TimerId, broadcast, find_any,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const POOL_QUICK: PoolId = PoolId(1);
const POOL_LONG_RUNNING: PoolId = PoolId(2);

struct StartPing {
	target: ActorRef,
	text: String,
}

impl MessageType for StartPing {
	const KIND: MessageKind = MessageKind::new(1);
}

struct Ping(String);

impl MessageType for Ping {
	const KIND: MessageKind = MessageKind::new(2);
}

struct Pong(String);

impl MessageType for Pong {
	const KIND: MessageKind = MessageKind::new(3);
}

struct Test {
	millis: u64,
	text: String,
}

impl MessageType for Test {
	const KIND: MessageKind = MessageKind::new(4);
}

/// Answers pings and starts ping exchanges on request.
struct Player {
	name: &'static str,
	heartbeat: Option<Duration>,
}

impl Actor for Player {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<StartPing>().on::<Ping>().on::<Pong>().on::<Test>();
	}

	fn on_start(&mut self, ctx: &Context) {
		if let Some(period) = self.heartbeat {
			match ctx.set_timer(period, true) {
				Ok(timer) => info!(player = self.name, %timer, "Heartbeat scheduled"),
				Err(err) => info!(player = self.name, %err, "Heartbeat rejected"),
			}
		}
	}

	fn on_timer(&mut self, timer: TimerId, _ctx: &Context) {
		info!(player = self.name, %timer, "Heartbeat");
	}

	fn on_exit(&mut self, _ctx: &Context) {
		info!(player = self.name, "Player leaving");
	}
}

impl Handler<StartPing> for Player {
	fn on_message(&mut self, msg: StartPing, ctx: &Context) {
		msg.target.send_with_reply(Ping(msg.text), ctx.actor());
	}
}

impl Handler<Ping> for Player {
	fn on_message(&mut self, msg: Ping, ctx: &Context) {
		info!(player = self.name, ping = %msg.0, "Got ping");
		ctx.reply(Pong(format!("Replying to {}", msg.0)));
	}
}

impl Handler<Pong> for Player {
	fn on_message(&mut self, msg: Pong, _ctx: &Context) {
		info!(player = self.name, pong = %msg.0, "Got pong");
	}
}

impl Handler<Test> for Player {
	fn on_message(&mut self, msg: Test, _ctx: &Context) {
		info!(player = self.name, n = msg.millis, text = %msg.text, "Test");
	}
}

/// Sleeps for the requested time on every message.
struct Sleeper {
	name: String,
}

impl Actor for Sleeper {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<Test>();
	}
}

impl Handler<Test> for Sleeper {
	fn on_message(&mut self, msg: Test, _ctx: &Context) {
		sleep(Duration::from_millis(msg.millis));
		info!(sleeper = %self.name, millis = msg.millis, text = %msg.text, "Done sleeping");
	}
}

fn main() -> hive_runtime::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let framework = Framework::with_config(FrameworkConfig::new().timer_tick(Duration::from_millis(10)))?;

	// Short handlers and long-running handlers get separate pools.
	framework.create_pool(PoolBuilder::new(POOL_QUICK).threads(3).name("quick").actor::<Player>())?;
	framework.create_pool(PoolBuilder::new(POOL_LONG_RUNNING).threads(3).name("long").actor::<Sleeper>())?;

	let alice = framework.create_actor(
		POOL_QUICK,
		Player {
			name: "alice",
			heartbeat: None,
		},
	)?;
	let bob = framework.create_actor(
		POOL_QUICK,
		Player {
			name: "bob",
			heartbeat: Some(Duration::from_millis(500)),
		},
	)?;
	let sleepers = vec![
		framework.create_actor(
			POOL_LONG_RUNNING,
			Sleeper {
				name: "sleeper 1".to_string(),
			},
		)?,
		framework.create_actor(
			POOL_LONG_RUNNING,
			Sleeper {
				name: "sleeper 2".to_string(),
			},
		)?,
	];

	alice.enqueue_fn(|actor| info!(actor = %actor.id(), "Function object called"));

	let timer = framework.set_timer(Duration::from_millis(200), true, |timer| info!(%timer, "Timer fired"))?;
	sleep(Duration::from_millis(1000));
	info!(%timer, "Cancelling timer");
	framework.cancel_timer(timer);
	sleep(Duration::from_millis(500));

	alice.send(StartPing {
		target: bob.clone(),
		text: "Ping msg".to_string(),
	});

	sleepers[0].send(Test {
		millis: 300,
		text: "I chose the actor".to_string(),
	});
	if let Some(sleeper) = find_any(&sleepers) {
		sleeper.send(Test {
			millis: 300,
			text: "the framework chose the actor".to_string(),
		});
	}
	broadcast(&sleepers, || Test {
		millis: 300,
		text: "broadcast".to_string(),
	});
	sleep(Duration::from_millis(1000));

	info!("Stopping alice with a full mailbox");
	for n in 0..1000 {
		alice.send(Test {
			millis: n,
			text: "test".to_string(),
		});
	}
	framework.stop_actor(&alice);
	info!(accepted = alice.send(Pong("too late".to_string())), "Sent to a stopped actor");

	sleep(Duration::from_millis(500));
	framework.shutdown()
}
