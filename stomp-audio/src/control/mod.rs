//! Control plane: knob/encoder sampling, presets, parameter edits and the
//! footswitch, publishing derived coefficients to the audio path.
//!
//! [`ControlPlane::tick`] runs at the control rate (~250 ms). It reads the
//! preset selector and the parameter cursor, quantizes the encoder into the
//! selected parameter and recomputes only what that parameter feeds; a
//! preset change recomputes everything. Every recomputation becomes visible
//! to the audio callback as one atomic snapshot.
//!
//! [`ControlPlane::switch_tick`] runs at the switch rate (~10 ms) and owns
//! the footswitch debouncer and the bypass flag.

pub mod cursor;
pub mod debounce;
pub mod encoder;
pub mod presets;

use crate::constants::FADE_FRAMES;
use crate::dsp::biquad::{BiquadCoeffs, FilterKind, FilterSpec};
use crate::dsp::dynamics::{CompressorParams, CompressorSpec};
use crate::dsp::{db_to_linear, Phase};
use crate::params::{ChainParams, SharedState};
use crate::platform::{Led, Platform};

use cursor::{descriptor, ParamId, ParamStore, ParameterCursor, PARAM_COUNT};
use debounce::FootswitchDebounce;
use encoder::{pulses_for, quantize, selector_with_pot, Saturation};
use presets::preset;

/// Knob carrying the preset selector.
pub const PRESET_KNOB: u8 = 0;
/// Knob carrying the parameter cursor selector.
pub const CURSOR_KNOB: u8 = 1;
/// Button wired to the footswitch.
pub const FOOTSWITCH_BUTTON: u8 = 5;

/// Preset selector width: 4 presets.
const PRESET_BITS: u8 = 2;
/// Cursor selector width: 16 positions, clamped onto the 11 parameters.
const CURSOR_BITS: u8 = 4;

/// Corner frequency of the bright (high-shelf) stage.
const BRIGHT_FREQ_HZ: f32 = 3_000.0;
/// Shelf slope of the bright stage.
const BRIGHT_SLOPE: f32 = 1.0;
/// Bandwidth of the hum notch, in octaves.
const NOTCH_BANDWIDTH_OCT: f32 = 1.0;

/// Low-rate state machine mutating the shared chain parameters.
pub struct ControlPlane<'a> {
    shared: &'a SharedState,
    store: ParamStore,
    cursor: ParameterCursor,
    preset_index: u16,
    debounce: FootswitchDebounce,
    /// Scratch copy the recompute steps edit before publication.
    working: ChainParams,
}

impl<'a> ControlPlane<'a> {
    /// Create a control plane with preset 0 loaded and published.
    pub fn new(shared: &'a SharedState) -> Self {
        let mut plane = ControlPlane {
            shared,
            store: ParamStore::new(),
            cursor: ParameterCursor::new(),
            preset_index: 0,
            debounce: FootswitchDebounce::new(),
            working: ChainParams::PASSTHROUGH,
        };
        plane.load_preset(0);
        plane.publish();
        plane
    }

    /// Control-rate tick: preset selection, cursor movement, one edit.
    pub fn tick<P: Platform>(&mut self, platform: &mut P) {
        let selected = selector_with_pot(platform.knob(PRESET_KNOB), PRESET_BITS);
        if selected != self.preset_index {
            self.shared.begin_fade(FADE_FRAMES);
            self.load_preset(selected);
            self.publish();
            platform.set_pulses(self.store.pulses(self.cursor.current()));
            return;
        }

        let position = selector_with_pot(platform.knob(CURSOR_KNOB), CURSOR_BITS);
        let id = ParamId::from_index(position as usize);
        if self.cursor.select(id) {
            // Resync: seed the live counter from the newly selected
            // parameter so stale pulses cannot jump its value.
            platform.set_pulses(self.store.pulses(id));
            return;
        }

        self.edit_current(platform);
    }

    /// Switch-rate tick: debounce the footswitch, toggle bypass.
    pub fn switch_tick<P: Platform>(&mut self, platform: &mut P) {
        if self.debounce.sample(platform.button(FOOTSWITCH_BUTTON)) {
            let engaged = self.shared.toggle_bypass();
            platform.set_led(Led::Blue, engaged);
        }
    }

    /// Currently selected parameter.
    pub fn cursor(&self) -> ParamId {
        self.cursor.current()
    }

    /// Stored value of a parameter.
    pub fn value(&self, id: ParamId) -> f32 {
        self.store.value(id)
    }

    /// Quantize the live pulse count into the cursor parameter.
    fn edit_current<P: Platform>(&mut self, platform: &mut P) {
        let id = self.cursor.current();
        let desc = descriptor(id);

        let quantized = quantize(platform.pulses(), desc);
        let clamped = pulses_for(quantized.value, desc);
        if quantized.saturation != Saturation::None {
            // Pin the counter at the bound so it cannot run away; the
            // parameter remains editable in the other direction.
            platform.set_pulses(clamped);
        }

        if clamped != self.store.pulses(id) {
            self.store.set_pulses(id, clamped);
            self.recompute(id);
            self.publish();
        }
    }

    /// Overwrite all parameters from a preset and recompute everything.
    fn load_preset(&mut self, index: u16) {
        let preset = preset(index);
        for id in ParamId::ALL {
            let desc = descriptor(id);
            let target = quantize(pulses_for(preset.value(id), desc), desc);
            self.store.set_pulses(id, pulses_for(target.value, desc));
        }
        for id in ParamId::ALL {
            self.recompute(id);
        }
        self.cursor.reset();
        self.preset_index = index;
    }

    /// Recompute the derived values one parameter feeds.
    fn recompute(&mut self, id: ParamId) {
        match id {
            ParamId::PreGain => {
                self.working.pre_gain = db_to_linear(self.store.value(ParamId::PreGain));
            }
            ParamId::Threshold
            | ParamId::Ratio
            | ParamId::Attack
            | ParamId::Hold
            | ParamId::Decay
            | ParamId::PostGain => {
                self.working.compressor = CompressorParams::derive(&self.compressor_spec());
            }
            ParamId::BrightBoost | ParamId::BrightPosition => {
                let shelf = self.bright_spec().coefficients();
                if self.store.value(ParamId::BrightPosition) >= 0.5 {
                    self.working.pre_filter = BiquadCoeffs::IDENTITY;
                    self.working.post_filter = shelf;
                } else {
                    self.working.pre_filter = shelf;
                    self.working.post_filter = BiquadCoeffs::IDENTITY;
                }
            }
            ParamId::MasterVolume => {
                self.working.master_gain =
                    db_to_linear(self.store.value(ParamId::MasterVolume));
            }
            ParamId::NotchFreq => {
                self.working.notch = self.notch_spec().coefficients();
            }
        }
    }

    fn publish(&self) {
        self.shared.params.publish(self.working);
    }

    fn compressor_spec(&self) -> CompressorSpec {
        CompressorSpec {
            threshold_db: self.store.value(ParamId::Threshold),
            ratio: self.store.value(ParamId::Ratio),
            attack_ms: self.store.value(ParamId::Attack),
            hold_ms: self.store.value(ParamId::Hold),
            decay_ms: self.store.value(ParamId::Decay),
            makeup_db: self.store.value(ParamId::PostGain),
        }
    }

    fn bright_spec(&self) -> FilterSpec {
        FilterSpec {
            kind: FilterKind::HighShelf {
                slope: BRIGHT_SLOPE,
            },
            freq_hz: BRIGHT_FREQ_HZ,
            boost_db: self.store.value(ParamId::BrightBoost),
            gain_db: 0.0,
            phase: Phase::Normal,
            enabled: true,
        }
    }

    fn notch_spec(&self) -> FilterSpec {
        FilterSpec {
            kind: FilterKind::Bandstop {
                bandwidth: NOTCH_BANDWIDTH_OCT,
            },
            freq_hz: self.store.value(ParamId::NotchFreq),
            boost_db: 0.0,
            gain_db: 0.0,
            phase: Phase::Normal,
            enabled: true,
        }
    }
}

/// Cursor positions beyond the parameter table clamp to the last entry, so
/// the selector width may exceed the table without a dead zone.
const _: () = assert!(PARAM_COUNT <= 1 << CURSOR_BITS);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADC_BITS, DEBOUNCE_DEPTH};
    use crate::platform::testing::MockPlatform;
    use approx::assert_relative_eq;

    /// Raw ADC value whose N-bit selector index is `index`.
    fn knob_raw(index: u16, bits: u8) -> u16 {
        index << (ADC_BITS - bits)
    }

    fn plane_and_platform(shared: &SharedState) -> (ControlPlane<'_>, MockPlatform) {
        (ControlPlane::new(shared), MockPlatform::new())
    }

    #[test]
    fn construction_publishes_preset_zero() {
        let shared = SharedState::new();
        let (plane, _) = plane_and_platform(&shared);

        assert_eq!(plane.value(ParamId::Ratio), 1.0);
        let snapshot = shared.params.read();
        // Ratio 1 degenerates to a unity gain computer.
        assert_eq!(snapshot.compressor.exponent, 0.0);
        assert_eq!(snapshot.pre_gain, 1.0);
    }

    #[test]
    fn preset_switch_loads_all_parameters_and_fades() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        platform.knobs[PRESET_KNOB as usize] = knob_raw(1, 2);
        plane.tick(&mut platform);

        assert_eq!(plane.value(ParamId::Threshold), -30.0);
        assert_eq!(plane.value(ParamId::Ratio), 4.0);
        assert_eq!(plane.value(ParamId::Attack), 53.0);
        assert_eq!(plane.value(ParamId::Decay), 500.0);
        assert_eq!(plane.value(ParamId::PostGain), 6.0);

        // Cursor back to the first parameter, live counter reseeded.
        assert_eq!(plane.cursor(), ParamId::PreGain);
        assert_eq!(platform.pulses, 0);

        // Fade armed, snapshot republished.
        assert!(shared.take_fade_frame());
        let snapshot = shared.params.read();
        assert_eq!(snapshot.compressor.exponent, 0.75);
        assert_relative_eq!(snapshot.compressor.makeup, db_to_linear(6.0));
    }

    #[test]
    fn cursor_resync_preserves_edits() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        // Select Threshold (index 1) — resync tick.
        platform.knobs[CURSOR_KNOB as usize] = knob_raw(1, 4);
        plane.tick(&mut platform);
        assert_eq!(plane.cursor(), ParamId::Threshold);
        assert_eq!(platform.pulses, plane.store.pulses(ParamId::Threshold));

        // Edit it to −12 dB.
        platform.pulses = -24;
        plane.tick(&mut platform);
        assert_eq!(plane.value(ParamId::Threshold), -12.0);

        // Move to Ratio (index 2): the edit survives and the counter is
        // seeded from Ratio's stored pulses, not the stale −24.
        platform.knobs[CURSOR_KNOB as usize] = knob_raw(2, 4);
        plane.tick(&mut platform);
        assert_eq!(plane.cursor(), ParamId::Ratio);
        assert_eq!(plane.value(ParamId::Threshold), -12.0);
        assert_eq!(platform.pulses, plane.store.pulses(ParamId::Ratio));
    }

    #[test]
    fn single_edit_recomputes_only_its_consumers() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        let before = shared.params.read();

        // Move to Ratio and set it to 8.
        platform.knobs[CURSOR_KNOB as usize] = knob_raw(2, 4);
        plane.tick(&mut platform);
        platform.pulses = 16;
        plane.tick(&mut platform);

        let after = shared.params.read();
        assert_eq!(after.compressor.exponent, 1.0 - 1.0 / 8.0);
        // Filters and gains are untouched, bit for bit.
        assert_eq!(after.pre_filter, before.pre_filter);
        assert_eq!(after.post_filter, before.post_filter);
        assert_eq!(after.notch, before.notch);
        assert_eq!(after.pre_gain, before.pre_gain);
        assert_eq!(after.master_gain, before.master_gain);
    }

    #[test]
    fn saturation_pins_the_pulse_counter() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        // Ratio tops out at 100 (200 pulses).
        platform.knobs[CURSOR_KNOB as usize] = knob_raw(2, 4);
        plane.tick(&mut platform);
        platform.pulses = 5_000;
        plane.tick(&mut platform);

        assert_eq!(plane.value(ParamId::Ratio), 100.0);
        assert_eq!(platform.pulses, 200);

        // Still editable downward afterwards.
        platform.pulses = 100;
        plane.tick(&mut platform);
        assert_eq!(plane.value(ParamId::Ratio), 50.0);
    }

    #[test]
    fn bright_position_moves_the_shelf_between_slots() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        // Give the shelf some boost first (cursor index 6).
        platform.knobs[CURSOR_KNOB as usize] = knob_raw(6, 4);
        plane.tick(&mut platform);
        platform.pulses = 12; // +6 dB
        plane.tick(&mut platform);

        let snapshot = shared.params.read();
        assert_eq!(snapshot.post_filter, BiquadCoeffs::IDENTITY);
        assert_ne!(snapshot.pre_filter, BiquadCoeffs::IDENTITY);
        let shelf = snapshot.pre_filter;

        // Flip the position to post (cursor index 7).
        platform.knobs[CURSOR_KNOB as usize] = knob_raw(7, 4);
        plane.tick(&mut platform);
        platform.pulses = 1;
        plane.tick(&mut platform);

        let snapshot = shared.params.read();
        assert_eq!(snapshot.pre_filter, BiquadCoeffs::IDENTITY);
        assert_eq!(snapshot.post_filter, shelf);
    }

    #[test]
    fn footswitch_toggles_bypass_exactly_once_per_press() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        assert!(!shared.is_bypassed());

        platform.buttons[FOOTSWITCH_BUTTON as usize] = true;
        for _ in 0..(DEBOUNCE_DEPTH as usize * 3) {
            plane.switch_tick(&mut platform);
        }
        // One toggle despite the long hold; the effect LED shows disengaged.
        assert!(shared.is_bypassed());
        assert!(!platform.led(Led::Blue));

        platform.buttons[FOOTSWITCH_BUTTON as usize] = false;
        plane.switch_tick(&mut platform);
        platform.buttons[FOOTSWITCH_BUTTON as usize] = true;
        for _ in 0..DEBOUNCE_DEPTH {
            plane.switch_tick(&mut platform);
        }
        assert!(!shared.is_bypassed());
        assert!(platform.led(Led::Blue));
    }

    #[test]
    fn debounce_dropout_prevents_the_toggle() {
        let shared = SharedState::new();
        let (mut plane, mut platform) = plane_and_platform(&shared);

        platform.buttons[FOOTSWITCH_BUTTON as usize] = true;
        for _ in 0..(DEBOUNCE_DEPTH - 1) {
            plane.switch_tick(&mut platform);
        }
        platform.buttons[FOOTSWITCH_BUTTON as usize] = false;
        plane.switch_tick(&mut platform);
        platform.buttons[FOOTSWITCH_BUTTON as usize] = true;
        for _ in 0..(DEBOUNCE_DEPTH - 1) {
            plane.switch_tick(&mut platform);
        }

        assert!(!shared.is_bypassed());
    }
}
