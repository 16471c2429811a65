//! Propagation delay between a send and its delivery.

use log::warn;

use crate::error::{ChannelResult, check_non_negative};

/// Seconds a message spends in flight, as a function of distance.
#[derive(Debug, Clone, Copy, Default)]
pub enum PropagationDelay {
    /// Delivered at the send instant (still as a separate event).
    #[default]
    Zero,
    /// Fixed latency regardless of distance.
    Constant(f64),
    /// `base + per_unit * distance`.
    Linear { base: f64, per_unit: f64 },
    /// Arbitrary function of distance.  Negative or non-finite results are
    /// clamped to zero.
    Custom(fn(f64) -> f64),
}

impl PropagationDelay {
    pub fn constant(secs: f64) -> ChannelResult<Self> {
        check_non_negative(secs, "constant delay")?;
        Ok(PropagationDelay::Constant(secs))
    }

    pub fn linear(base: f64, per_unit: f64) -> ChannelResult<Self> {
        check_non_negative(base, "delay base")?;
        check_non_negative(per_unit, "delay per unit distance")?;
        Ok(PropagationDelay::Linear { base, per_unit })
    }

    /// Re-check a value built directly from its variants.
    pub fn validate(&self) -> ChannelResult<()> {
        match *self {
            PropagationDelay::Zero | PropagationDelay::Custom(_) => Ok(()),
            PropagationDelay::Constant(s) => check_non_negative(s, "constant delay"),
            PropagationDelay::Linear { base, per_unit } => {
                check_non_negative(base, "delay base")?;
                check_non_negative(per_unit, "delay per unit distance")
            }
        }
    }

    /// Delay in seconds for a link of length `distance`.  Never negative.
    pub fn delay_for(&self, distance: f64) -> f64 {
        match *self {
            PropagationDelay::Zero => 0.0,
            PropagationDelay::Constant(s) => s,
            PropagationDelay::Linear { base, per_unit } => base + per_unit * distance,
            PropagationDelay::Custom(f) => {
                let d = f(distance);
                if d.is_finite() && d >= 0.0 {
                    d
                } else {
                    warn!("custom propagation delay returned {d} for distance {distance}; using 0");
                    0.0
                }
            }
        }
    }
}
