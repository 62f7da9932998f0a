//! Dynamics compressor: RMS envelope follower, gain computer, makeup gain.
//!
//! Detection is stereo-linked: the rectified input is `max(|L|, |R|)` and a
//! single computed gain is applied identically to both channels, so the
//! stereo image never shifts under compression.

use libm::{expf, fabsf, fmaxf, powf, sqrtf};

use crate::dsp::db_to_linear;
use crate::constants::SAMPLE_RATE_HZ;
use crate::frame::FloatFrame;

/// Envelope noise floor, −40 dBFS linear. The detected envelope is clamped
/// here before the gain computation so near-silence cannot blow up the
/// `threshold / envelope` division.
pub const NOISE_FLOOR: f32 = 0.01;

/// User-facing compressor settings. Mutated by the control plane; the audio
/// path consumes the derived [`CompressorParams`] snapshot instead.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CompressorSpec {
    /// Threshold in dB, −90..+6.
    pub threshold_db: f32,
    /// Compression ratio, 1..100. Values ≤ 1 disable compression.
    pub ratio: f32,
    /// Attack time in ms, 1..500.
    pub attack_ms: f32,
    /// Hold time in ms, 1..attack. Carried for the preset table; the RMS
    /// detector does not use it.
    pub hold_ms: f32,
    /// Release time in ms, up to 2000.
    pub decay_ms: f32,
    /// Makeup gain in dB, −30..+24.
    pub makeup_db: f32,
}

/// Audio-rate compressor coefficients derived from a [`CompressorSpec`]
/// once per control tick.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CompressorParams {
    /// One-pole smoothing gain while the envelope rises.
    pub attack_g: f32,
    /// One-pole smoothing gain while the envelope falls.
    pub release_g: f32,
    /// Threshold as linear amplitude.
    pub threshold: f32,
    /// Gain-computer exponent, `1 − 1/ratio` (0 for ratio ≤ 1).
    pub exponent: f32,
    /// Makeup gain as linear amplitude.
    pub makeup: f32,
}

impl CompressorParams {
    /// No compression, no makeup: output equals input.
    pub const UNITY: Self = CompressorParams {
        attack_g: 0.0,
        release_g: 0.0,
        threshold: 1.0,
        exponent: 0.0,
        makeup: 1.0,
    };

    /// Derive the per-sample coefficients from user settings.
    ///
    /// Smoothing gains follow `exp(−1 / (fs · t))`; a ratio of 1 or less
    /// degenerates to a unity gain computer rather than an error.
    pub fn derive(spec: &CompressorSpec) -> Self {
        let attack_s = spec.attack_ms * 1e-3;
        let decay_s = spec.decay_ms * 1e-3;

        CompressorParams {
            attack_g: expf(-1.0 / (SAMPLE_RATE_HZ * attack_s)),
            release_g: expf(-1.0 / (SAMPLE_RATE_HZ * decay_s)),
            threshold: db_to_linear(spec.threshold_db),
            exponent: if spec.ratio > 1.0 {
                1.0 - 1.0 / spec.ratio
            } else {
                0.0
            },
            makeup: db_to_linear(spec.makeup_db),
        }
    }

    /// Compress one frame in place.
    ///
    /// Per sample: rectify (`max(|L|,|R|)`), square, smooth asymmetrically
    /// (attack gain when the squared value exceeds the running envelope,
    /// release gain otherwise), square-root back to an RMS envelope, clamp
    /// to the noise floor, then apply
    /// `gain = min(1, (threshold / envelope) ^ exponent)` and makeup to
    /// both channels.
    pub fn process(&self, env: &mut EnvelopeState, frame: &mut FloatFrame) {
        for pair in frame.s.iter_mut() {
            let rectified = fmaxf(fabsf(pair[0]), fabsf(pair[1]));
            let squared = rectified * rectified;

            let g = if env.squared < squared {
                self.attack_g
            } else {
                self.release_g
            };
            env.squared = squared + g * (env.squared - squared);

            let mut envelope = sqrtf(env.squared);
            if envelope < NOISE_FLOOR {
                envelope = NOISE_FLOOR;
            }

            let mut gain = powf(self.threshold / envelope, self.exponent);
            if gain > 1.0 {
                gain = 1.0;
            }

            pair[0] *= gain * self.makeup;
            pair[1] *= gain * self.makeup;
        }
    }
}

/// Running envelope memory. Process-wide lifetime: continuously updated
/// every frame and never reset after power-on.
#[derive(Clone, Copy, Debug)]
pub struct EnvelopeState {
    /// Smoothed square of the rectified input.
    squared: f32,
}

impl EnvelopeState {
    pub const fn new() -> Self {
        EnvelopeState { squared: 0.0 }
    }
}
