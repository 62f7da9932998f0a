//! Signal chain orchestrator: the body of the audio-rate callback.
//!
//! Runs once per fixed-size frame against a hard deadline: no blocking, no
//! allocation, no unbounded loops. Active pipeline:
//!
//! ```text
//! int → float → pre-gain → pre biquad → compressor → post biquad
//!     → notch biquad → master gain → float → int
//! ```
//!
//! Bypass still routes through the float domain (with a unity gain stage)
//! so its quantization matches the active path. A transient fade-out mode
//! halves the previous integer output buffer in place instead of computing
//! a new frame; the control plane arms it when switching programs to avoid
//! audible pops.

use crate::dsp::biquad::BiquadState;
use crate::dsp::dynamics::EnvelopeState;
use crate::dsp::gain;
use crate::frame::{AudioFrame, FloatFrame};
use crate::params::SharedState;
use crate::platform::{Led, Platform};

/// Per-frame processor. Owns all cross-frame DSP state (filter delay
/// memory, the compressor envelope); reads published parameters from the
/// shared snapshot each frame.
pub struct SignalChain<'a> {
    shared: &'a SharedState,
    pre_state: BiquadState,
    post_state: BiquadState,
    notch_state: BiquadState,
    envelope: EnvelopeState,
    scratch: FloatFrame,
}

impl<'a> SignalChain<'a> {
    pub fn new(shared: &'a SharedState) -> Self {
        SignalChain {
            shared,
            pre_state: BiquadState::new(),
            post_state: BiquadState::new(),
            notch_state: BiquadState::new(),
            envelope: EnvelopeState::new(),
            scratch: FloatFrame::silent(),
        }
    }

    /// Process one frame.
    ///
    /// `output` must hold the previous frame's output on entry: the
    /// fade-out mode rereads and halves it in place. The green LED marks
    /// callback activity; the red LED is the advisory clip indicator
    /// (nothing is limited on clip — detection only).
    pub fn process<P: Platform>(
        &mut self,
        input: &AudioFrame,
        output: &mut AudioFrame,
        platform: &mut P,
    ) {
        platform.set_led(Led::Green, true);

        if self.shared.take_fade_frame() {
            output.halve();
            platform.set_led(Led::Green, false);
            return;
        }

        self.scratch.load(input);

        if self.shared.is_bypassed() {
            gain::process(&mut self.scratch, 1.0);
        } else {
            let params = self.shared.params.read();

            gain::process(&mut self.scratch, params.pre_gain);
            params.pre_filter.process(&mut self.pre_state, &mut self.scratch);
            params
                .compressor
                .process(&mut self.envelope, &mut self.scratch);
            params
                .post_filter
                .process(&mut self.post_state, &mut self.scratch);
            params.notch.process(&mut self.notch_state, &mut self.scratch);
            gain::process(&mut self.scratch, params.master_gain);
        }

        platform.set_led(Led::Red, self.scratch.will_clip());
        self.scratch.store(output);

        platform.set_led(Led::Green, false);
    }
}
