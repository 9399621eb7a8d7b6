//! Readiness policy: quorum threshold plus assembly timeout.

use super::errors::PolicyError;
use std::time::Duration;

/// When a miner may stop assembling and start sealing.
///
/// A pool is ready once it holds `threshold()` records, or once `t_wait` has
/// elapsed since its first record of the round.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessPolicy {
    /// Baseline quorum.
    h: usize,
    /// Fractional slack over the expected population.
    delta: f64,
    /// Expected population size.
    nd: usize,
    /// Assembly timeout measured from the first record.
    t_wait: Duration,
    /// `h + floor(delta * nd)`, checked at construction.
    threshold: usize,
}

impl ReadinessPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    /// `InvalidDelta` if `delta` is negative, NaN or infinite;
    /// `ThresholdOverflow` if `h + floor(delta * nd)` does not fit a `usize`.
    pub fn new(h: usize, delta: f64, nd: usize, t_wait: Duration) -> Result<Self, PolicyError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(PolicyError::InvalidDelta(delta));
        }
        let threshold = checked_threshold(h, delta, nd)
            .ok_or(PolicyError::ThresholdOverflow { h, delta, nd })?;
        Ok(Self {
            h,
            delta,
            nd,
            t_wait,
            threshold,
        })
    }

    /// `h + floor(delta * nd)`.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Assembly timeout.
    pub fn t_wait(&self) -> Duration {
        self.t_wait
    }

    pub fn h(&self) -> usize {
        self.h
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn nd(&self) -> usize {
        self.nd
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            h: 5,
            delta: 0.2,
            nd: 10,
            t_wait: Duration::from_secs(2),
            threshold: 7,
        }
    }
}

fn checked_threshold(h: usize, delta: f64, nd: usize) -> Option<usize> {
    let slack = (delta * nd as f64).floor();
    // usize::MAX as f64 rounds up to 2^64, which is itself out of range.
    if slack >= usize::MAX as f64 {
        return None;
    }
    h.checked_add(slack as usize)
}
