//! Assembly pool error types.

use thiserror::Error;

/// Readiness policy configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// Slack must be a finite, non-negative fraction.
    #[error("Invalid delta {0}: must be finite and >= 0")]
    InvalidDelta(f64),

    /// `h + floor(delta * nd)` does not fit a `usize`.
    #[error("Readiness threshold overflows: h={h}, delta={delta}, nd={nd}")]
    ThresholdOverflow { h: usize, delta: f64, nd: usize },
}
