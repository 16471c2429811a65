//! highway: a roadside unit on a 2 km highway segment.
//!
//! Four eastbound cars follow scripted paths, two westbound cars replay a
//! recorded trace, and a survey drone wanders over the segment on its own
//! band.  Every node broadcasts a beacon once per second; the roadside unit
//! acknowledges each beacon it hears, buffering acks for cars that have
//! already driven out of range.
//!
//! Usage: `highway [config.json]`, where the optional file holds a
//! `SimConfig` (`start_time`, `stop_time`, `mobility_step`, `seed`).  Set
//! `RUST_LOG=debug` for per-event engine logs.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use vs_channel::{PathLoss, PropagationDelay};
use vs_core::{Area, HandlerId, NodeId, NodeKind, Point, SimConfig, SimTime};
use vs_mobility::{FixedPath, RandomWaypoint, RandomWaypointConfig, load_traces_reader};
use vs_sim::{
    DeliveryPolicy, DropReason, Message, NodeSpec, Recipient, RunSummary, SimBuilder, SimObserver,
    Simulator, replica_seeds, run_replicas,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 42;
const STOP_SECS:      f64 = 90.0;
const BEACON_PERIOD:  f64 = 1.0;
const REPLICAS:       usize = 4;
const ITS_BAND_HZ:    f64 = 5.9e9;
const DRONE_BAND_HZ:  f64 = 2.4e9;
const RSU:            NodeId = NodeId(0);

// Westbound traffic recorded by a loop detector, one row per sample.
const WESTBOUND_TRACE: &str = "\
node,time,x,y\n\
10,0,2000,-5\n\
10,30,1200,-5\n\
10,60,300,-5\n\
10,80,0,-5\n\
11,10,2000,-8\n\
11,50,1000,-8\n\
11,90,0,-8\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Counts {
    delivered: BTreeMap<NodeId, u64>,
    dropped:   HashMap<DropReason, u64>,
    departed:  Vec<(NodeId, SimTime)>,
    ticks:     u64,
}

/// Shared tallies; the simulator owns one clone, `main` reads the other.
#[derive(Clone, Default)]
struct Tally(Rc<RefCell<Counts>>);

impl Tally {
    fn delivered_total(&self) -> u64 {
        self.0.borrow().delivered.values().sum()
    }
}

impl SimObserver for Tally {
    fn on_delivered(&mut self, message: &Message, _now: SimTime) {
        *self.0.borrow_mut().delivered.entry(message.receiver).or_default() += 1;
    }

    fn on_dropped(&mut self, _message: &Message, reason: DropReason, _now: SimTime) {
        *self.0.borrow_mut().dropped.entry(reason).or_default() += 1;
    }

    fn on_node_removed(&mut self, node: NodeId, now: SimTime) {
        self.0.borrow_mut().departed.push((node, now));
    }

    fn on_mobility_tick(&mut self, now: SimTime) {
        self.0.borrow_mut().ticks += 1;
        info!("{now}: mobility tick");
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        info!("run finished: {:?} at {}", summary.reason, summary.final_time);
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// 20 dBm transmitters over a log-distance channel: roughly 255 m of range.
fn channel() -> Result<PathLoss> {
    Ok(PathLoss::new(20.0, 40.0, 1.0, 2.7, -85.0)?)
}

fn load_config() -> Result<SimConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = std::fs::File::open(&path).with_context(|| format!("opening {path}"))?;
            let mut config: SimConfig =
                serde_json::from_reader(file).with_context(|| format!("parsing {path}"))?;
            // The drone beacons forever; without a bound the run never ends.
            if config.stop_time.is_none() {
                warn!("{path} sets no stop_time; using {STOP_SECS} s");
                config.stop_time = Some(STOP_SECS);
            }
            Ok(config)
        }
        None => Ok(SimConfig {
            stop_time:     Some(STOP_SECS),
            mobility_step: Some(10.0),
            seed:          SEED,
            ..SimConfig::default()
        }),
    }
}

fn build_scenario(config: SimConfig, tally: Tally) -> Result<Simulator<PathLoss>> {
    let ack_buffer = DeliveryPolicy::BufferUntilReachable { ttl: 5.0, retry_interval: 0.5 };

    let mut builder = SimBuilder::new(config, channel()?)
        // Speed of light.
        .propagation_delay(PropagationDelay::linear(0.0, 1.0 / 3.0e8)?)
        .observer(tally)
        .node(
            NodeSpec::fixed(RSU, Point::new(1000.0, 20.0))?
                .kind(NodeKind::BaseStation)
                .frequency(ITS_BAND_HZ)
                .policy(ack_buffer),
        );

    for (i, speed) in [25.0, 28.0, 31.0, 33.0].into_iter().enumerate() {
        let lane_y = if i % 2 == 0 { 5.0 } else { 8.0 };
        let start = Point::new(-150.0 * i as f64, lane_y);
        let path = FixedPath::with_waypoints(start, [(speed, Point::new(2000.0, lane_y))])?;
        builder = builder.node(NodeSpec::new(NodeId(i as u32 + 1), path).frequency(ITS_BAND_HZ));
    }

    for (id, trace) in load_traces_reader(Cursor::new(WESTBOUND_TRACE))? {
        builder = builder.node(NodeSpec::new(id, trace).frequency(ITS_BAND_HZ));
    }

    let survey = RandomWaypointConfig {
        area:      Area::new(0.0, -200.0, 2000.0, 200.0),
        min_speed: 5.0,
        max_speed: 15.0,
        min_pause: 0.0,
        max_pause: 10.0,
    };
    builder = builder.node(
        NodeSpec::new(NodeId(20), RandomWaypoint::new(Point::new(1000.0, 0.0), survey)?)
            .kind(NodeKind::Drone)
            .frequency(DRONE_BAND_HZ),
    );

    let mut sim = builder.build()?;

    // The roadside unit acknowledges every beacon it hears.
    sim.set_receive_handler(RSU, |sim, msg| {
        sim.send(RSU, Recipient::Unicast(msg.sender), b"ack".to_vec())?;
        Ok(())
    })?;

    // Cars and traced vehicles leave the segment when their trajectory ends.
    let drivers: Vec<NodeId> = sim
        .node_ids()
        .filter(|&id| sim.node(id).is_some_and(|n| n.kind() == NodeKind::Vehicle))
        .collect();
    for id in drivers {
        sim.set_mobility_end_handler(id, |sim, node| {
            info!("{}: {node} left the segment", sim.now());
            sim.remove_node(node)?;
            Ok(())
        })?;
    }

    // Beacons re-arm themselves until their node leaves the segment.
    let beacon_id: Rc<Cell<Option<HandlerId>>> = Rc::default();
    let me = beacon_id.clone();
    let beacon = sim.register_handler(move |sim, payload| {
        let node = NodeId(u32::from_le_bytes(<[u8; 4]>::try_from(payload)?));
        if sim.node(node).is_none() {
            return Ok(());
        }
        sim.send(node, Recipient::Broadcast, payload)?;
        if let Some(h) = me.get() {
            sim.schedule_in(BEACON_PERIOD, h, payload)?;
        }
        Ok(())
    });
    beacon_id.set(Some(beacon));

    let ids: Vec<NodeId> = sim.node_ids().filter(|&id| id != RSU).collect();
    for (i, id) in ids.into_iter().enumerate() {
        // Stagger so beacons do not all land on the same instant.
        sim.schedule_in(0.1 * i as f64, beacon, id.get().to_le_bytes().to_vec())?;
    }
    Ok(sim)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    println!("=== highway — vanet-sim ===");
    println!(
        "Seed: {}  |  Stop: {}  |  Tick: {}",
        config.seed,
        config.stop_time.map_or("none".to_string(), |s| format!("{s} s")),
        config.mobility_step.map_or("off".to_string(), |s| format!("{s} s")),
    );
    println!();

    let tally = Tally::default();
    let mut sim = build_scenario(config.clone(), tally.clone())?;
    println!("Nodes: {}  |  Pending events: {}", sim.node_count(), sim.pending_events());

    let t0 = Instant::now();
    let summary = sim.run()?;
    let elapsed = t0.elapsed();

    println!(
        "Run ended ({:?}) at {} after {} events in {:.3} s",
        summary.reason,
        summary.final_time,
        summary.dispatched,
        elapsed.as_secs_f64()
    );
    println!();

    let counts = tally.0.borrow();
    println!("{:<10} {:<10}", "Node", "Received");
    println!("{}", "-".repeat(20));
    for (node, n) in &counts.delivered {
        println!("{:<10} {:<10}", node.to_string(), n);
    }
    println!();
    for reason in [
        DropReason::Unreachable,
        DropReason::Expired,
        DropReason::ReceiverRemoved,
        DropReason::SenderRemoved,
    ] {
        println!("dropped ({reason}): {}", counts.dropped.get(&reason).copied().unwrap_or(0));
    }
    for (node, at) in &counts.departed {
        println!("{node} left the segment at {at}");
    }
    println!("mobility ticks: {}", counts.ticks);
    println!();

    // Independent replicas with derived seeds.
    let seeds = replica_seeds(config.seed, REPLICAS);
    let results = run_replicas(&seeds, |seed| -> Result<u64> {
        let tally = Tally::default();
        let mut sim = build_scenario(SimConfig { seed, ..config.clone() }, tally.clone())?;
        sim.run()?;
        Ok(tally.delivered_total())
    });
    println!("{:<22} {:<10}", "Replica seed", "Delivered");
    println!("{}", "-".repeat(32));
    for (seed, result) in seeds.iter().zip(results) {
        println!("{:<22} {:<10}", seed, result?);
    }

    Ok(())
}
