//! State shared between the control plane and the audio callback.
//!
//! All multi-field parameter data crosses priority levels as one immutable
//! [`ChainParams`] snapshot; the single-scalar bypass flag and fade counter
//! are plain atomics. Nothing here can block the audio path.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::dsp::biquad::BiquadCoeffs;
use crate::dsp::dynamics::CompressorParams;
use crate::publish::SnapshotCell;

/// Everything the signal chain reads per frame, derived by the control
/// plane and published as one consistent unit.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ChainParams {
    /// Linear input gain.
    pub pre_gain: f32,
    /// Pre-emphasis stage ahead of the compressor.
    pub pre_filter: BiquadCoeffs,
    pub compressor: CompressorParams,
    /// De-emphasis/coloration stage after the compressor.
    pub post_filter: BiquadCoeffs,
    /// Hum/resonance notch.
    pub notch: BiquadCoeffs,
    /// Linear output (master volume) gain.
    pub master_gain: f32,
}

impl ChainParams {
    /// Neutral chain: unity gains, identity filters, no compression.
    pub const PASSTHROUGH: Self = ChainParams {
        pre_gain: 1.0,
        pre_filter: BiquadCoeffs::IDENTITY,
        compressor: CompressorParams::UNITY,
        post_filter: BiquadCoeffs::IDENTITY,
        notch: BiquadCoeffs::IDENTITY,
        master_gain: 1.0,
    };
}

/// Shared resources. `const`-constructible so firmware can keep one in a
/// `static`; writers are the control-rate and switch-rate activities, the
/// sole audio-rate reader is the signal chain.
pub struct SharedState {
    pub params: SnapshotCell<ChainParams>,
    bypass: AtomicBool,
    fade_frames: AtomicU32,
}

impl SharedState {
    pub const fn new() -> Self {
        SharedState {
            params: SnapshotCell::new(ChainParams::PASSTHROUGH),
            bypass: AtomicBool::new(false),
            fade_frames: AtomicU32::new(0),
        }
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass.load(Ordering::Acquire)
    }

    pub fn set_bypassed(&self, on: bool) {
        self.bypass.store(on, Ordering::Release);
    }

    /// Flip the bypass flag; returns true if the effect is now engaged.
    pub fn toggle_bypass(&self) -> bool {
        self.bypass.fetch_xor(true, Ordering::AcqRel)
    }

    /// Start a fade-out transient of `frames` audio frames.
    pub fn begin_fade(&self, frames: u32) {
        self.fade_frames.store(frames, Ordering::Release);
    }

    /// Consume one fade frame if a fade is in progress (audio side only).
    pub fn take_fade_frame(&self) -> bool {
        let remaining = self.fade_frames.load(Ordering::Acquire);
        if remaining == 0 {
            return false;
        }
        self.fade_frames.store(remaining - 1, Ordering::Release);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_toggles_and_reports() {
        let shared = SharedState::new();
        assert!(!shared.is_bypassed());

        // First toggle moves engaged → bypassed, so the effect is no
        // longer engaged afterwards.
        assert!(!shared.toggle_bypass());
        assert!(shared.is_bypassed());
        assert!(shared.toggle_bypass());
        assert!(!shared.is_bypassed());
    }

    #[test]
    fn fade_counts_down_to_zero() {
        let shared = SharedState::new();
        assert!(!shared.take_fade_frame());

        shared.begin_fade(2);
        assert!(shared.take_fade_frame());
        assert!(shared.take_fade_frame());
        assert!(!shared.take_fade_frame());
    }

    #[test]
    fn snapshot_starts_neutral() {
        let shared = SharedState::new();
        assert_eq!(shared.params.read(), ChainParams::PASSTHROUGH);
    }
}
