//! Trace-driven mobility and its CSV loaders.
//!
//! # CSV formats
//!
//! Single-node trace ([`load_trace_csv`]), one sample per row, sorted by
//! time.  `z` is optional:
//!
//! ```csv
//! time,x,y,z
//! 0.0,0.0,0.0,0.0
//! 5.0,50.0,0.0,0.0
//! 9.5,50.0,40.0,0.0
//! ```
//!
//! Multi-node trace ([`load_traces_csv`]) adds a leading `node` column.
//! Rows for different nodes may be interleaved; each node's rows must be
//! sorted by time.
//!
//! ```csv
//! node,time,x,y
//! 1,0.0,0.0,0.0
//! 2,0.0,100.0,0.0
//! 1,4.0,40.0,0.0
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use vs_core::{Heading, NodeId, NodeRng, Point, SimTime};

use crate::error::{MobilityError, MobilityResult};
use crate::MobilityModel;

/// One recorded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub time:     SimTime,
    pub position: Point,
}

impl TraceSample {
    pub fn new(time: SimTime, position: Point) -> Self {
        Self { time, position }
    }
}

/// Replays a recorded trajectory.
///
/// Between samples the position is linearly interpolated; before the first
/// sample the node sits at the first position, after the last it holds the
/// last one.  The model asks for an update at every sample time so that
/// observers see the node cross each recorded point.
#[derive(Debug, Clone)]
pub struct TraceDriven {
    samples: Vec<TraceSample>,
    /// Index of the next sample the simulator has not yet reached.
    next:    usize,
}

impl TraceDriven {
    /// Fails unless `samples` is non-empty, finite and sorted by time.
    pub fn new(samples: Vec<TraceSample>) -> MobilityResult<Self> {
        if samples.is_empty() {
            return Err(MobilityError::InvalidConfiguration("trace has no samples".into()));
        }
        if let Some(bad) = samples.iter().find(|s| !s.position.is_finite()) {
            return Err(MobilityError::InvalidConfiguration(format!(
                "trace sample at {} has a non-finite position",
                bad.time
            )));
        }
        if let Some(w) = samples.windows(2).find(|w| w[1].time < w[0].time) {
            return Err(MobilityError::InvalidConfiguration(format!(
                "trace is not sorted: {} follows {}",
                w[1].time, w[0].time
            )));
        }
        Ok(Self { samples, next: 0 })
    }

    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Index of the first sample strictly after `now`.
    fn upper(&self, now: SimTime) -> usize {
        self.samples.partition_point(|s| s.time <= now)
    }
}

impl MobilityModel for TraceDriven {
    fn position_at(&self, now: SimTime) -> Point {
        let i = self.upper(now);
        if i == 0 {
            return self.samples[0].position;
        }
        let a = &self.samples[i - 1];
        let Some(b) = self.samples.get(i) else {
            return a.position;
        };
        let span = b.time.since(a.time);
        if span <= 0.0 {
            return b.position;
        }
        a.position.lerp(b.position, now.since(a.time) / span)
    }

    fn heading_at(&self, now: SimTime) -> Heading {
        // Direction of the segment being travelled, or the last one.
        if self.samples.len() < 2 {
            return Heading::NORTH;
        }
        let i = self.upper(now).clamp(1, self.samples.len() - 1);
        self.samples[i - 1].position.azimuth_to(self.samples[i].position)
    }

    fn initial_schedule(&mut self, now: SimTime) -> Option<SimTime> {
        self.next = self.upper(now);
        self.samples.get(self.next).map(|s| s.time)
    }

    fn on_update(&mut self, now: SimTime, _rng: &mut NodeRng) -> Option<SimTime> {
        self.next = self.upper(now);
        self.samples.get(self.next).map(|s| s.time)
    }

    fn is_finished(&self) -> bool {
        self.next >= self.samples.len()
    }

    fn name(&self) -> &'static str {
        "trace"
    }
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SampleRecord {
    time: f64,
    x:    f64,
    y:    f64,
    #[serde(default)]
    z:    f64,
}

#[derive(Deserialize)]
struct NodeSampleRecord {
    node: u32,
    time: f64,
    x:    f64,
    y:    f64,
    #[serde(default)]
    z:    f64,
}

fn to_sample(time: f64, x: f64, y: f64, z: f64) -> MobilityResult<TraceSample> {
    let time = SimTime::new(time)
        .map_err(|e| MobilityError::Parse(format!("bad trace time: {e}")))?;
    Ok(TraceSample::new(time, Point::new_3d(x, y, z)))
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a single-node trace from a CSV file.
pub fn load_trace_csv(path: &Path) -> MobilityResult<TraceDriven> {
    let file = std::fs::File::open(path)?;
    load_trace_reader(file)
}

/// Like [`load_trace_csv`] but accepts any `Read` source.
pub fn load_trace_reader<R: Read>(reader: R) -> MobilityResult<TraceDriven> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut samples = Vec::new();
    for result in csv_reader.deserialize::<SampleRecord>() {
        let row = result.map_err(|e| MobilityError::Parse(e.to_string()))?;
        samples.push(to_sample(row.time, row.x, row.y, row.z)?);
    }
    TraceDriven::new(samples)
}

/// Load per-node traces from a CSV file with a `node` column.
///
/// Returns one `TraceDriven` per node that appears in the file, keyed and
/// ordered by `NodeId`.
pub fn load_traces_csv(path: &Path) -> MobilityResult<BTreeMap<NodeId, TraceDriven>> {
    let file = std::fs::File::open(path)?;
    load_traces_reader(file)
}

/// Like [`load_traces_csv`] but accepts any `Read` source.
pub fn load_traces_reader<R: Read>(reader: R) -> MobilityResult<BTreeMap<NodeId, TraceDriven>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_node: BTreeMap<NodeId, Vec<TraceSample>> = BTreeMap::new();

    for result in csv_reader.deserialize::<NodeSampleRecord>() {
        let row = result.map_err(|e| MobilityError::Parse(e.to_string()))?;
        let sample = to_sample(row.time, row.x, row.y, row.z)?;
        by_node.entry(NodeId(row.node)).or_default().push(sample);
    }

    by_node
        .into_iter()
        .map(|(node, samples)| Ok((node, TraceDriven::new(samples)?)))
        .collect()
}
