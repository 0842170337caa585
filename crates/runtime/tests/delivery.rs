// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	thread,
	time::Duration,
};

use hive_runtime::{
	Actor, ActorRef, Context, Framework, Handler, MessageKind, MessageType, PoolBuilder, PoolId, Routes,
	broadcast, broadcast_fn, find_any,
};
use hive_testing::{Recorder, logging, wait_for};

struct Note {
	producer: usize,
	seq: usize,
}

impl MessageType for Note {
	const KIND: MessageKind = MessageKind::new(1);
}

struct Unrouted;

impl MessageType for Unrouted {
	const KIND: MessageKind = MessageKind::new(2);
}

struct Sink {
	seen: Recorder<(usize, usize)>,
}

impl Actor for Sink {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<Note>();
	}
}

impl Handler<Note> for Sink {
	fn on_message(&mut self, msg: Note, _ctx: &Context) {
		self.seen.record((msg.producer, msg.seq));
	}
}

fn framework_with_pool(id: u32, threads: usize, builder: impl FnOnce(PoolBuilder) -> PoolBuilder) -> (Framework, PoolId) {
	logging::init();
	let framework = Framework::new().unwrap();
	let pool = framework.create_pool(builder(PoolBuilder::new(PoolId(id)).threads(threads))).unwrap();
	(framework, pool)
}

#[test]
fn test_three_producers_one_thread() {
	let (framework, pool) = framework_with_pool(1, 1, |b| b.actor::<Sink>());
	let seen = Recorder::new();
	let sink = framework
		.create_actor(
			pool,
			Sink {
				seen: seen.clone(),
			},
		)
		.unwrap();

	let producers: Vec<_> = (0..3)
		.map(|producer| {
			let sink = sink.clone();
			thread::spawn(move || {
				sink.send(Note {
					producer,
					seq: 0,
				});
			})
		})
		.collect();
	for producer in producers {
		producer.join().unwrap();
	}

	wait_for(|| seen.len() == 3, "all three notes delivered");
	thread::sleep(Duration::from_millis(20));

	let mut producers: Vec<_> = seen.events().into_iter().map(|(producer, _)| producer).collect();
	producers.sort();
	assert_eq!(producers, vec![0, 1, 2]);

	framework.shutdown().unwrap();
}

#[test]
fn test_fifo_per_producer() {
	const PRODUCERS: usize = 4;
	const PER_PRODUCER: usize = 500;

	let (framework, pool) = framework_with_pool(1, 4, |b| b.actor::<Sink>());
	let seen = Recorder::new();
	let sink = framework
		.create_actor(
			pool,
			Sink {
				seen: seen.clone(),
			},
		)
		.unwrap();

	let producers: Vec<_> = (0..PRODUCERS)
		.map(|producer| {
			let sink = sink.clone();
			thread::spawn(move || {
				for seq in 0..PER_PRODUCER {
					sink.send(Note {
						producer,
						seq,
					});
				}
			})
		})
		.collect();
	for producer in producers {
		producer.join().unwrap();
	}

	wait_for(|| seen.len() == PRODUCERS * PER_PRODUCER, "every note delivered");

	let mut next = [0usize; PRODUCERS];
	for (producer, seq) in seen.events() {
		assert_eq!(seq, next[producer], "producer {} out of order", producer);
		next[producer] += 1;
	}
	assert!(next.iter().all(|&n| n == PER_PRODUCER));

	framework.shutdown().unwrap();
}

struct Exclusive {
	running: Arc<AtomicBool>,
	overlaps: Arc<AtomicUsize>,
	handled: Arc<AtomicUsize>,
}

impl Actor for Exclusive {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<Note>();
	}
}

impl Handler<Note> for Exclusive {
	fn on_message(&mut self, _msg: Note, _ctx: &Context) {
		if self.running.swap(true, Ordering::SeqCst) {
			self.overlaps.fetch_add(1, Ordering::SeqCst);
		}
		thread::yield_now();
		self.running.store(false, Ordering::SeqCst);
		self.handled.fetch_add(1, Ordering::SeqCst);
	}
}

#[test]
fn test_actor_never_runs_concurrently() {
	let (framework, pool) = framework_with_pool(1, 8, |b| b.actor::<Exclusive>());
	let running = Arc::new(AtomicBool::new(false));
	let overlaps = Arc::new(AtomicUsize::new(0));
	let handled = Arc::new(AtomicUsize::new(0));

	let actor = framework
		.create_actor(
			pool,
			Exclusive {
				running: running.clone(),
				overlaps: overlaps.clone(),
				handled: handled.clone(),
			},
		)
		.unwrap();

	let producers: Vec<_> = (0..8)
		.map(|producer| {
			let actor = actor.clone();
			thread::spawn(move || {
				for seq in 0..250 {
					actor.send(Note {
						producer,
						seq,
					});
				}
			})
		})
		.collect();
	for producer in producers {
		producer.join().unwrap();
	}

	wait_for(|| handled.load(Ordering::SeqCst) == 2000, "every note handled");
	assert_eq!(overlaps.load(Ordering::SeqCst), 0);

	framework.shutdown().unwrap();
}

#[test]
fn test_many_actors_share_pool() {
	let (framework, pool) = framework_with_pool(1, 3, |b| b.actor::<Sink>());
	let seen = Recorder::new();
	let sinks: Vec<ActorRef> = (0..16)
		.map(|_| {
			framework
				.create_actor(
					pool,
					Sink {
						seen: seen.clone(),
					},
				)
				.unwrap()
		})
		.collect();

	for (producer, sink) in sinks.iter().enumerate() {
		for seq in 0..50 {
			sink.send(Note {
				producer,
				seq,
			});
		}
	}

	wait_for(|| seen.len() == 16 * 50, "every note delivered");
	framework.shutdown().unwrap();
}

#[test]
fn test_unrouted_kind_is_dropped() {
	let (framework, pool) = framework_with_pool(1, 1, |b| b.actor::<Sink>());
	let seen = Recorder::new();
	let sink = framework
		.create_actor(
			pool,
			Sink {
				seen: seen.clone(),
			},
		)
		.unwrap();

	sink.send(Unrouted);
	sink.send(Note {
		producer: 0,
		seq: 0,
	});

	wait_for(|| seen.len() == 1, "routed note delivered");
	wait_for(|| sink.pending() == 0, "mailbox drained");

	framework.shutdown().unwrap();
}

#[test]
fn test_actor_not_registered_with_pool() {
	// The pool knows no actor types: the actor exists but drops everything.
	let (framework, pool) = framework_with_pool(1, 1, |b| b);
	let seen = Recorder::new();
	let sink = framework
		.create_actor(
			pool,
			Sink {
				seen: seen.clone(),
			},
		)
		.unwrap();

	assert!(
		sink.send(Note {
			producer: 0,
			seq: 0,
		}) > 0
	);
	wait_for(|| sink.pending() == 0, "message consumed");
	assert!(seen.is_empty());

	framework.shutdown().unwrap();
}

struct Ping(u32);

impl MessageType for Ping {
	const KIND: MessageKind = MessageKind::new(10);
}

struct Pong(u32);

impl MessageType for Pong {
	const KIND: MessageKind = MessageKind::new(11);
}

struct Ponger;

impl Actor for Ponger {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<Ping>();
	}
}

impl Handler<Ping> for Ponger {
	fn on_message(&mut self, msg: Ping, ctx: &Context) {
		ctx.reply(Pong(msg.0 + 1));
	}
}

struct Pinger {
	pongs: Recorder<u32>,
	replied_by: Recorder<Option<hive_runtime::ActorId>>,
}

impl Actor for Pinger {
	fn routes(routes: &mut Routes<Self>) {
		routes.on::<Pong>();
	}
}

impl Handler<Pong> for Pinger {
	fn on_message(&mut self, msg: Pong, ctx: &Context) {
		self.pongs.record(msg.0);
		self.replied_by.record(ctx.reply_to_id());
	}
}

#[test]
fn test_reply_routing() {
	let (framework, pool) = framework_with_pool(1, 2, |b| b.actor::<Pinger>().actor::<Ponger>());
	let pongs = Recorder::new();
	let replied_by = Recorder::new();

	let pinger = framework
		.create_actor(
			pool,
			Pinger {
				pongs: pongs.clone(),
				replied_by: replied_by.clone(),
			},
		)
		.unwrap();
	let ponger = framework.create_actor(pool, Ponger).unwrap();

	ponger.send_with_reply(Ping(41), &pinger);
	wait_for(|| pongs.len() == 1, "pong received");

	assert_eq!(pongs.events(), vec![42]);
	assert_eq!(replied_by.events(), vec![Some(ponger.id())]);

	// Without a reply target the answer goes nowhere.
	ponger.send(Ping(1));
	wait_for(|| ponger.pending() == 0, "ping handled");
	thread::sleep(Duration::from_millis(20));
	assert_eq!(pongs.len(), 1);

	framework.shutdown().unwrap();
}

#[test]
fn test_reply_to_stopped_actor_is_dropped() {
	let (framework, pool) = framework_with_pool(1, 2, |b| b.actor::<Pinger>().actor::<Ponger>());
	let pongs = Recorder::new();

	let pinger = framework
		.create_actor(
			pool,
			Pinger {
				pongs: pongs.clone(),
				replied_by: Recorder::new(),
			},
		)
		.unwrap();
	let ponger = framework.create_actor(pool, Ponger).unwrap();

	framework.stop_actor(&pinger);
	ponger.send_with_reply(Ping(1), &pinger);
	wait_for(|| ponger.pending() == 0, "ping handled");
	thread::sleep(Duration::from_millis(20));
	assert!(pongs.is_empty());

	framework.shutdown().unwrap();
}

#[derive(Default)]
struct Counter {
	count: usize,
}

impl Actor for Counter {}

#[test]
fn test_invoke_runs_on_actor_state() {
	let (framework, pool) = framework_with_pool(1, 2, |b| b.actor::<Counter>());
	let counter = framework.create_actor(pool, Counter::default()).unwrap();
	let observed = Recorder::new();

	for _ in 0..10 {
		counter.invoke::<Counter, _>(|counter, _ctx| counter.count += 1);
	}
	let recorded = observed.clone();
	counter.invoke::<Counter, _>(move |counter, ctx| {
		recorded.record((counter.count, ctx.id()));
	});

	wait_for(|| observed.len() == 1, "invoke ran");
	assert_eq!(observed.events(), vec![(10, counter.id())]);

	framework.shutdown().unwrap();
}

#[test]
fn test_invoke_with_wrong_type_is_dropped() {
	let (framework, pool) = framework_with_pool(1, 1, |b| b.actor::<Counter>().actor::<Sink>());
	let counter = framework.create_actor(pool, Counter::default()).unwrap();
	let ran = Arc::new(AtomicBool::new(false));

	let flag = ran.clone();
	counter.invoke::<Sink, _>(move |_, _| flag.store(true, Ordering::SeqCst));
	wait_for(|| counter.pending() == 0, "invoke consumed");
	assert!(!ran.load(Ordering::SeqCst));

	framework.shutdown().unwrap();
}

#[test]
fn test_enqueue_fn_keeps_mailbox_order() {
	let (framework, pool) = framework_with_pool(1, 2, |b| b.actor::<Sink>());
	let seen = Recorder::new();
	let sink = framework
		.create_actor(
			pool,
			Sink {
				seen: seen.clone(),
			},
		)
		.unwrap();

	sink.send(Note {
		producer: 0,
		seq: 0,
	});
	let recorded = seen.clone();
	let expected = sink.id();
	sink.enqueue_fn(move |actor| {
		assert_eq!(actor.id(), expected);
		recorded.record((1, 0));
	});
	sink.send(Note {
		producer: 2,
		seq: 0,
	});

	wait_for(|| seen.len() == 3, "all three delivered");
	assert_eq!(seen.events(), vec![(0, 0), (1, 0), (2, 0)]);

	framework.shutdown().unwrap();
}

#[test]
fn test_group_helpers() {
	let (framework, pool) = framework_with_pool(1, 2, |b| b.actor::<Sink>());
	let seen = Recorder::new();
	let sinks: Vec<ActorRef> = (0..4)
		.map(|_| {
			framework
				.create_actor(
					pool,
					Sink {
						seen: seen.clone(),
					},
				)
				.unwrap()
		})
		.collect();

	assert!(find_any(&sinks).is_some());
	assert!(find_any(&Vec::<ActorRef>::new()).is_none());

	let mut seq = 0;
	let accepted = broadcast(&sinks, || {
		seq += 1;
		Note {
			producer: 0,
			seq,
		}
	});
	assert_eq!(accepted, 4);
	wait_for(|| seen.len() == 4, "broadcast delivered");

	let mut seqs: Vec<_> = seen.events().into_iter().map(|(_, seq)| seq).collect();
	seqs.sort();
	assert_eq!(seqs, vec![1, 2, 3, 4]);

	let calls = Arc::new(AtomicUsize::new(0));
	let counted = calls.clone();
	let accepted = broadcast_fn(&sinks, move |_| {
		counted.fetch_add(1, Ordering::SeqCst);
	});
	assert_eq!(accepted, 4);
	wait_for(|| calls.load(Ordering::SeqCst) == 4, "broadcast_fn ran everywhere");

	framework.stop_actor(&sinks[0]);
	assert_eq!(
		broadcast(&sinks, || Note {
			producer: 0,
			seq: 0,
		}),
		3
	);

	framework.shutdown().unwrap();
}
