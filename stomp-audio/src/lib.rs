//! # stomp-audio
//!
//! A `no_std`, zero-allocation audio core for a stereo compressor pedal:
//! a fixed-function signal chain (gain staging, parametric/shelving filters,
//! a dynamics compressor, a notch filter) driven by knobs, an encoder and a
//! footswitch, with compiled-in presets.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Frames | [`frame`] | Interleaved stereo frames, integer/float conversion |
//! | DSP | [`dsp`] | Filter design, IIR execution, dynamics, gain staging |
//! | Chain | [`chain`] | Per-frame pipeline run by the audio callback |
//! | Control | [`control`] | Knob/encoder quantization, presets, debounce |
//! | Sharing | [`publish`] / [`params`] | Atomic snapshot publication |
//! | Platform | [`platform`] | Injected knob/button/LED collaborator |
//!
//! ## Real-time contract
//!
//! Three periodic activities share state, highest priority first:
//!
//! - **Audio rate** — [`chain::SignalChain::process`] runs once per frame and
//!   must finish before the next frame is due. It never blocks, never
//!   allocates, and reads shared parameters through a single atomic snapshot.
//! - **Control rate** (~250 ms) — [`control::ControlPlane::tick`] samples
//!   knobs and the encoder, recomputes filter coefficients and publishes them.
//! - **Switch rate** (~10 ms) — [`control::ControlPlane::switch_tick`]
//!   debounces the footswitch and flips the bypass flag.
//!
//! The platform (callback scheduling, ADC/GPIO sampling, the audio transport)
//! is injected through the [`platform::Platform`] trait; the pipeline code is
//! identical whether it runs against hardware or a host test double.
//!
//! ## Audio parameters
//!
//! - **Frame size:** 64 stereo samples ([`constants::SAMPLES_PER_FRAME`])
//! - **Sample rate:** 48 kHz ([`constants::SAMPLE_RATE_HZ`])
//! - **Sample format:** interleaved `i16`, processed as `f32` in ±1.0

#![no_std]

pub mod constants;
pub mod frame;
pub mod platform;
pub mod publish;
pub mod params;
pub mod dsp;
pub mod chain;
pub mod control;
