//! Log-distance path loss.
//!
//! ```text
//! PL(d)  = PL(d0) + 10 · n · log10(d / d0)      for d >= d0
//! Rx(d)  = Ptx - PL(d)
//! linked = Rx(d) >= sensitivity
//! ```
//!
//! Distances below the reference distance `d0` use `PL(d0)`.  This is a
//! link-budget abstraction for connectivity, not a propagation model.

use vs_core::SimTime;

use crate::error::{ChannelError, ChannelResult, check_positive};
use crate::{ChannelModel, Endpoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLoss {
    tx_power_dbm:       f64,
    reference_loss_db:  f64,
    reference_distance: f64,
    exponent:           f64,
    sensitivity_dbm:    f64,
    /// Distance at which `Rx == sensitivity`, precomputed.
    range:              f64,
}

impl PathLoss {
    /// Fails unless the distances and exponent are positive and the budget
    /// leaves a positive margin at the reference distance.
    pub fn new(
        tx_power_dbm: f64,
        reference_loss_db: f64,
        reference_distance: f64,
        exponent: f64,
        sensitivity_dbm: f64,
    ) -> ChannelResult<Self> {
        check_positive(reference_distance, "reference_distance")?;
        check_positive(exponent, "path loss exponent")?;
        let margin = tx_power_dbm - reference_loss_db - sensitivity_dbm;
        if !margin.is_finite() || margin <= 0.0 {
            return Err(ChannelError::InvalidConfiguration(format!(
                "link budget margin at reference distance must be positive, got {margin} dB"
            )));
        }
        let range = reference_distance * 10f64.powf(margin / (10.0 * exponent));
        Ok(Self {
            tx_power_dbm,
            reference_loss_db,
            reference_distance,
            exponent,
            sensitivity_dbm,
            range,
        })
    }

    /// Received power at distance `d`, in dBm.
    pub fn received_dbm(&self, d: f64) -> f64 {
        let d = d.max(self.reference_distance);
        let loss = self.reference_loss_db + 10.0 * self.exponent * (d / self.reference_distance).log10();
        self.tx_power_dbm - loss
    }

    /// Distance at which the received power drops to the sensitivity.
    #[inline]
    pub fn range(&self) -> f64 {
        self.range
    }

    fn margin(&self, d: f64) -> f64 {
        self.received_dbm(d) - self.sensitivity_dbm
    }
}

impl ChannelModel for PathLoss {
    fn connected(&self, from: &Endpoint, to: &Endpoint, _now: SimTime) -> bool {
        self.margin(from.distance_to(to)) >= 0.0
    }

    /// Remaining margin as a fraction of the margin at the reference
    /// distance.
    fn quality(&self, from: &Endpoint, to: &Endpoint, _now: SimTime) -> f64 {
        let best = self.margin(self.reference_distance);
        (self.margin(from.distance_to(to)) / best).clamp(0.0, 1.0)
    }

    fn max_range(&self) -> Option<f64> {
        Some(self.range)
    }

    fn name(&self) -> &'static str {
        "path_loss"
    }
}
