//! Simulated time model.
//!
//! # Design
//!
//! Time is continuous and measured in simulated seconds.  `SimTime` wraps an
//! `f64` that is guaranteed finite and non-negative, which is what makes the
//! manual `Ord` impl below sound: with NaN excluded, `f64::total_cmp` is a
//! total order that agrees with `==` (negative zero is normalised away at
//! construction).
//!
//! The engine never reads time from ambient state.  The event queue owns
//! "now" and hands it explicitly to every model operation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{CoreError, CoreResult};

// ── SimTime ──────────────────────────────────────────────────────────────────

/// A point on the simulated time axis, in seconds.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// The latest representable instant; "never" for practical purposes.
    pub const MAX: SimTime = SimTime(f64::MAX);

    /// Validate `secs` and wrap it.
    ///
    /// Fails with [`CoreError::InvalidTime`] for negative, NaN, or infinite
    /// input.
    pub fn new(secs: f64) -> CoreResult<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(CoreError::InvalidTime(secs));
        }
        // `-0.0 + 0.0 == +0.0`; keeps `Ord` consistent with `PartialEq`.
        Ok(SimTime(secs + 0.0))
    }

    /// Seconds since time zero.
    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// The time `delay` seconds after `self`.
    ///
    /// `delay` must be finite and non-negative.
    pub fn after(self, delay: f64) -> CoreResult<SimTime> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(CoreError::InvalidTime(delay));
        }
        SimTime::new(self.0 + delay)
    }

    /// Seconds elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl From<u32> for SimTime {
    #[inline]
    fn from(secs: u32) -> SimTime {
        SimTime(f64::from(secs))
    }
}

impl TryFrom<f64> for SimTime {
    type Error = CoreError;
    fn try_from(secs: f64) -> CoreResult<SimTime> {
        SimTime::new(secs)
    }
}

impl From<SimTime> for f64 {
    #[inline]
    fn from(t: SimTime) -> f64 {
        t.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for SimTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}s", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level engine configuration.
///
/// Scenario programs typically load this from JSON (with the `serde`
/// feature) and hand it to the simulator builder, which calls
/// [`validate`](Self::validate).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated time at which the clock starts.  Default: 0.
    pub start_time: f64,

    /// Default upper bound for `run()`.  `None` runs until the queue drains
    /// or a stop is requested.
    pub stop_time: Option<f64>,

    /// Period of the mobility tick that reports every node's position to
    /// observers.  `None` disables the tick.
    pub mobility_step: Option<f64>,

    /// Master RNG seed.  The same seed and scenario reproduce the same run.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time:    0.0,
            stop_time:     None,
            mobility_step: None,
            seed:          0,
        }
    }
}

impl SimConfig {
    /// Check every field, failing fast before a scenario starts.
    pub fn validate(&self) -> CoreResult<()> {
        let start = self.start()?;
        if let Some(stop) = self.stop()? {
            if stop < start {
                return Err(CoreError::InvalidConfiguration(format!(
                    "stop_time {stop} precedes start_time {start}"
                )));
            }
        }
        if let Some(step) = self.mobility_step {
            if !step.is_finite() || step <= 0.0 {
                return Err(CoreError::InvalidConfiguration(format!(
                    "mobility_step must be positive, got {step}"
                )));
            }
        }
        Ok(())
    }

    /// The start time as a validated `SimTime`.
    pub fn start(&self) -> CoreResult<SimTime> {
        SimTime::new(self.start_time)
    }

    /// The stop time as a validated `SimTime`, if configured.
    pub fn stop(&self) -> CoreResult<Option<SimTime>> {
        self.stop_time.map(SimTime::new).transpose()
    }
}
