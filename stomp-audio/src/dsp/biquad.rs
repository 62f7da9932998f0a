//! Second-order (biquad) filter design and execution.
//!
//! Coefficients describe the transfer function
//!
//! ```text
//!          b0 + b1*z^-1 + b2*z^-2
//!  H(z) = ------------------------
//!           1 + a1*z^-1 + a2*z^-2
//! ```
//!
//! where a0 has been normalized to 1. Coefficients are only ever produced by
//! the designer ([`FilterSpec::coefficients`] / [`ToneSpec::coefficients`]);
//! raw unnormalized values are never stored.
//!
//! Design formulas follow the cookbook forms by Robert Bristow-Johnson,
//! "Cookbook formulae for audio EQ biquad filter coefficients",
//! <http://www.musicdsp.org/files/Audio-EQ-Cookbook.txt>.

use core::f32::consts::{FRAC_1_SQRT_2, LN_2, PI};

use libm::{cosf, powf, sinf, sinhf, sqrtf, tanf};

use crate::constants::{CHANNELS, SAMPLE_RATE_HZ};
use crate::dsp::{db_to_linear, hz_to_omega, Phase};
use crate::frame::FloatFrame;

/// Normalized biquad coefficients (a0 = 1).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BiquadCoeffs {
    // poles
    pub a1: f32,
    pub a2: f32,
    // zeros
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
}

impl BiquadCoeffs {
    /// The identity transfer function: output equals input exactly.
    pub const IDENTITY: Self = BiquadCoeffs {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    };

    /// Run the filter over one frame in place, per channel independently.
    ///
    /// Direct form I: `y = b0·x + b1·x₋₁ + b2·x₋₂ − a1·y₋₁ − a2·y₋₂`, with
    /// the shift registers updated after every sample. No clamping; overflow
    /// is a downstream concern. Output depends only on (coefficients, prior
    /// state, input).
    pub fn process(&self, state: &mut BiquadState, frame: &mut FloatFrame) {
        for pair in frame.s.iter_mut() {
            for ch in 0..CHANNELS {
                let x = pair[ch];
                let y = self.b0 * x + self.b1 * state.x[0][ch] + self.b2 * state.x[1][ch]
                    - self.a1 * state.y[0][ch]
                    - self.a2 * state.y[1][ch];
                state.x[1][ch] = state.x[0][ch];
                state.x[0][ch] = x;
                state.y[1][ch] = state.y[0][ch];
                state.y[0][ch] = y;
                pair[ch] = y;
            }
        }
    }
}

/// Stereo delay memory for one biquad stage.
///
/// Owned by the stage it belongs to; persists across frames and is reset
/// only when the stage is (re)initialized.
#[derive(Clone, Copy, Debug)]
pub struct BiquadState {
    /// Previous two inputs, `x[delay][channel]`.
    pub x: [[f32; CHANNELS]; 2],
    /// Previous two outputs, `y[delay][channel]`.
    pub y: [[f32; CHANNELS]; 2],
}

impl BiquadState {
    pub const fn new() -> Self {
        BiquadState {
            x: [[0.0; CHANNELS]; 2],
            y: [[0.0; CHANNELS]; 2],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Second-order filter kinds, each carrying its own resonance parameter.
///
/// Butterworth and Bessel variants use fixed Q (1/√2 and 1/√3).
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FilterKind {
    Peaking { q: f32 },
    Parametric { q: f32 },
    LowShelf { slope: f32 },
    HighShelf { slope: f32 },
    Lowpass { q: f32 },
    Highpass { q: f32 },
    /// Bandwidth in octaves.
    Bandpass { bandwidth: f32 },
    /// Bandwidth in octaves.
    Bandstop { bandwidth: f32 },
    ButterworthLowpass,
    ButterworthHighpass,
    BesselLowpass,
    BesselHighpass,
}

/// User-facing description of one second-order filter stage.
///
/// Mutated only by the control plane; read only by the designer.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FilterSpec {
    pub kind: FilterKind,
    /// Center/cutoff frequency in Hz.
    pub freq_hz: f32,
    /// Shelf/peak boost in dB (`A = 10^(boost/40)`).
    pub boost_db: f32,
    /// Overall stage gain in dB, applied to the numerator.
    pub gain_db: f32,
    pub phase: Phase,
    pub enabled: bool,
}

/// Unnormalized coefficients straight out of a design formula.
struct RawBiquad {
    a0: f32,
    a1: f32,
    a2: f32,
    b0: f32,
    b1: f32,
    b2: f32,
}

impl RawBiquad {
    /// Normalize by a0 and apply the stage polarity.
    ///
    /// Inverting the phase negates the numerator only; the pole positions
    /// do not depend on input polarity. A degenerate a0 of zero yields the
    /// identity (logic default, not a failure).
    fn normalized(&self, phase: Phase) -> BiquadCoeffs {
        if self.a0 == 0.0 {
            return BiquadCoeffs::IDENTITY;
        }
        let inv = 1.0 / self.a0;
        let sign = phase.sign();
        BiquadCoeffs {
            a1: self.a1 * inv,
            a2: self.a2 * inv,
            b0: sign * self.b0 * inv,
            b1: sign * self.b1 * inv,
            b2: sign * self.b2 * inv,
        }
    }
}

impl FilterSpec {
    /// Design the normalized coefficients for this stage.
    ///
    /// A disabled stage yields [`BiquadCoeffs::IDENTITY`] regardless of
    /// kind: that is the bypass contract for an individual stage.
    pub fn coefficients(&self) -> BiquadCoeffs {
        if !self.enabled {
            return BiquadCoeffs::IDENTITY;
        }

        let w0 = hz_to_omega(self.freq_hz);
        let sin_w0 = sinf(w0);
        let cos_w0 = cosf(w0);
        let a = powf(10.0, self.boost_db / 40.0);
        let g = db_to_linear(self.gain_db);

        let raw = match self.kind {
            FilterKind::Peaking { q } | FilterKind::Parametric { q } => {
                let alpha = sin_w0 / (2.0 * q);
                RawBiquad {
                    a0: 1.0 + alpha / a,
                    a1: -2.0 * cos_w0,
                    a2: 1.0 - alpha / a,
                    b0: (1.0 + alpha * a) * g,
                    b1: -2.0 * cos_w0 * g,
                    b2: (1.0 - alpha * a) * g,
                }
            }
            FilterKind::LowShelf { slope } => {
                let alpha = shelf_alpha(sin_w0, a, slope);
                let k = 2.0 * sqrtf(a) * alpha;
                RawBiquad {
                    a0: (a + 1.0) + (a - 1.0) * cos_w0 + k,
                    a1: -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a2: (a + 1.0) + (a - 1.0) * cos_w0 - k,
                    b0: a * ((a + 1.0) - (a - 1.0) * cos_w0 + k) * g,
                    b1: 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0) * g,
                    b2: a * ((a + 1.0) - (a - 1.0) * cos_w0 - k) * g,
                }
            }
            FilterKind::HighShelf { slope } => {
                let alpha = shelf_alpha(sin_w0, a, slope);
                let k = 2.0 * sqrtf(a) * alpha;
                RawBiquad {
                    a0: (a + 1.0) - (a - 1.0) * cos_w0 + k,
                    a1: 2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a2: (a + 1.0) - (a - 1.0) * cos_w0 - k,
                    b0: a * ((a + 1.0) + (a - 1.0) * cos_w0 + k) * g,
                    b1: -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0) * g,
                    b2: a * ((a + 1.0) + (a - 1.0) * cos_w0 - k) * g,
                }
            }
            FilterKind::Lowpass { q } => lowpass_raw(sin_w0 / (2.0 * q), cos_w0, g),
            FilterKind::Highpass { q } => highpass_raw(sin_w0 / (2.0 * q), cos_w0, g),
            FilterKind::Bandpass { bandwidth } => {
                let alpha = band_alpha(sin_w0, w0, bandwidth);
                RawBiquad {
                    a0: 1.0 + alpha,
                    a1: -2.0 * cos_w0,
                    a2: 1.0 - alpha,
                    b0: alpha * g,
                    b1: 0.0,
                    b2: -alpha * g,
                }
            }
            FilterKind::Bandstop { bandwidth } => {
                let alpha = band_alpha(sin_w0, w0, bandwidth);
                RawBiquad {
                    a0: 1.0 + alpha,
                    a1: -2.0 * cos_w0,
                    a2: 1.0 - alpha,
                    b0: g,
                    b1: -2.0 * cos_w0 * g,
                    b2: g,
                }
            }
            // Fixed-Q variants: alpha = sin(w0)/(2·Q).
            FilterKind::ButterworthLowpass => lowpass_raw(sin_w0 * FRAC_1_SQRT_2, cos_w0, g),
            FilterKind::ButterworthHighpass => highpass_raw(sin_w0 * FRAC_1_SQRT_2, cos_w0, g),
            FilterKind::BesselLowpass => lowpass_raw(sin_w0 * sqrtf(3.0) / 2.0, cos_w0, g),
            FilterKind::BesselHighpass => highpass_raw(sin_w0 * sqrtf(3.0) / 2.0, cos_w0, g),
        };

        raw.normalized(self.phase)
    }
}

fn shelf_alpha(sin_w0: f32, a: f32, slope: f32) -> f32 {
    sin_w0 / 2.0 * sqrtf((a + 1.0 / a) * (1.0 / slope - 1.0) + 2.0)
}

fn band_alpha(sin_w0: f32, w0: f32, bandwidth_oct: f32) -> f32 {
    sin_w0 * sinhf(LN_2 / 2.0 * bandwidth_oct * w0 / sin_w0)
}

fn lowpass_raw(alpha: f32, cos_w0: f32, g: f32) -> RawBiquad {
    let b1 = (1.0 - cos_w0) * g;
    RawBiquad {
        a0: 1.0 + alpha,
        a1: -2.0 * cos_w0,
        a2: 1.0 - alpha,
        b0: b1 * 0.5,
        b1,
        b2: b1 * 0.5,
    }
}

fn highpass_raw(alpha: f32, cos_w0: f32, g: f32) -> RawBiquad {
    let b1 = -(1.0 + cos_w0) * g;
    RawBiquad {
        a0: 1.0 + alpha,
        a1: -2.0 * cos_w0,
        a2: 1.0 - alpha,
        b0: b1 * -0.5,
        b1,
        b2: b1 * -0.5,
    }
}

/// Baxandall dual-band tone control.
///
/// Two single-pole shelving prototypes (bass, treble) composed algebraically
/// into one second-order transfer function before normalization. The same
/// enabled/phase rules as [`FilterSpec`] apply.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ToneSpec {
    pub bass_boost_db: f32,
    pub treble_boost_db: f32,
    pub bass_freq_hz: f32,
    pub treble_freq_hz: f32,
    pub phase: Phase,
    pub enabled: bool,
}

impl ToneSpec {
    pub fn coefficients(&self) -> BiquadCoeffs {
        if !self.enabled {
            return BiquadCoeffs::IDENTITY;
        }

        let tb = db_to_linear(self.treble_boost_db);
        let bb = db_to_linear(self.bass_boost_db);

        // Bilinear prototypes: one pole/zero pair per band.
        let w_t = tanf(PI * self.treble_freq_hz / SAMPLE_RATE_HZ);
        let w_b = tanf(PI * self.bass_freq_hz / SAMPLE_RATE_HZ);

        let knum_t = 2.0 / (1.0 + 1.0 / tb);
        let kden_t = 2.0 / (1.0 + tb);
        let knum_b = 2.0 / (1.0 + 1.0 / bb);
        let kden_b = 2.0 / (1.0 + bb);

        let alpha0 = w_t + kden_t;
        let beta1 = w_t + knum_t;
        let alpha1 = w_t - kden_t;
        let beta2 = w_t - knum_t;

        let alpha2 = w_b * kden_b + 1.0;
        let beta3 = w_b * knum_b - 1.0;
        let alpha3 = w_b * kden_b - 1.0;
        let beta4 = w_b * knum_b + 1.0;

        let raw = RawBiquad {
            a0: alpha0 * alpha2,
            a1: alpha0 * alpha3 + alpha1 * alpha2,
            a2: alpha1 * alpha3,
            b0: beta1 * beta3,
            b1: beta1 * beta4 + beta2 * beta3,
            b2: beta2 * beta4,
        };

        raw.normalized(self.phase)
    }
}


#[cfg(test)]
impl BiquadCoeffs {
    /// Test helper: run only the first `n` sample pairs of a frame.
    fn process_partial(&self, state: &mut BiquadState, frame: &mut FloatFrame, n: usize) {
        for pair in frame.s[..n].iter_mut() {
            for ch in 0..CHANNELS {
                let x = pair[ch];
                let y = self.b0 * x + self.b1 * state.x[0][ch] + self.b2 * state.x[1][ch]
                    - self.a1 * state.y[0][ch]
                    - self.a2 * state.y[1][ch];
                state.x[1][ch] = state.x[0][ch];
                state.x[0][ch] = x;
                state.y[1][ch] = state.y[0][ch];
                state.y[0][ch] = y;
                pair[ch] = y;
            }
        }
    }
}
