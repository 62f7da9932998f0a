/// Stereo samples per audio frame (one processing quantum).
pub const SAMPLES_PER_FRAME: usize = 64;

/// Channels per frame (stereo).
pub const CHANNELS: usize = 2;

/// Audio sample rate in Hz, fixed by the codec transport. All time-constant
/// math (frequency normalization, attack/release smoothing) depends on it.
pub const SAMPLE_RATE_HZ: f32 = 48_000.0;

/// Integer full-scale magnitude; the float domain is `sample / FULL_SCALE`.
pub const FULL_SCALE: f32 = 32_768.0;

/// ADC resolution of the knob inputs, in bits.
pub const ADC_BITS: u8 = 12;

/// Highest raw value a knob ADC can report.
pub const ADC_MAX: u16 = (1 << ADC_BITS) - 1;

/// Period of the control-rate activity (knob sampling, coefficient
/// recomputation), in milliseconds.
pub const CONTROL_TICK_MS: u32 = 250;

/// Period of the footswitch sampling activity, in milliseconds.
pub const SWITCH_TICK_MS: u32 = 10;

/// Consecutive pressed samples required before the footswitch toggles.
pub const DEBOUNCE_DEPTH: u8 = 5;

/// Frames of output halving after a program switch (~43 ms). Halving full
/// scale 16 times already reaches below one LSB; the margin covers frames
/// that start mid-fade.
pub const FADE_FRAMES: u32 = 32;
