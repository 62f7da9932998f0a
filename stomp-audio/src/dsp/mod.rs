//! DSP building blocks: filter design and execution, dynamics, gain.

pub mod biquad;
pub mod dynamics;
pub mod first_order;
pub mod gain;

use crate::constants::SAMPLE_RATE_HZ;
use libm::{log10f, powf};

/// dB to linear amplitude: `10^(dB/20)`.
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Linear amplitude to dB: `20·log10(x)`.
pub fn linear_to_db(x: f32) -> f32 {
    20.0 * log10f(x)
}

/// Frequency in Hz to normalized angular frequency in radians,
/// `w0 = 2π·f / sample_rate`.
pub fn hz_to_omega(f: f32) -> f32 {
    2.0 * core::f32::consts::PI * f / SAMPLE_RATE_HZ
}

/// Polarity of a filter stage.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// 0° — output in phase with the input.
    Normal,
    /// 180° — numerator coefficients negated; the poles are unaffected.
    Inverted,
}

impl Phase {
    pub(crate) fn sign(self) -> f32 {
        match self {
            Phase::Normal => 1.0,
            Phase::Inverted => -1.0,
        }
    }
}
