//! Quantization of raw knob and encoder inputs.
//!
//! Pots arrive as 12-bit ADC samples, the encoder as a relative pulse
//! count. Selectors right-shift a pot down to a small index; continuous
//! parameters scale pulses by a per-parameter precision and clamp to the
//! parameter's range, reporting saturation so the caller can pin the live
//! pulse counter at the bound.

use crate::constants::{ADC_BITS, ADC_MAX};
use crate::control::cursor::ParamDesc;
use libm::roundf;

/// Direction in which a quantized value hit its range bound.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Saturation {
    /// In range; pulses may accumulate freely.
    None,
    /// Clamped at the maximum; stop counting up.
    Positive,
    /// Clamped at the minimum; stop counting down.
    Negative,
}

/// A quantized parameter value plus its clamp status.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Quantized {
    pub value: f32,
    pub saturation: Saturation,
}

/// Scale a pulse count by the parameter's precision and clamp into range.
///
/// Saturation is informational: it never blocks future edits.
pub fn quantize(pulses: i32, desc: &ParamDesc) -> Quantized {
    let raw = pulses as f32 * desc.precision;
    if raw > desc.max {
        Quantized {
            value: desc.max,
            saturation: Saturation::Positive,
        }
    } else if raw < desc.min {
        Quantized {
            value: desc.min,
            saturation: Saturation::Negative,
        }
    } else {
        Quantized {
            value: raw,
            saturation: Saturation::None,
        }
    }
}

/// Pulse count whose quantization yields `value` (nearest step).
pub fn pulses_for(value: f32, desc: &ParamDesc) -> i32 {
    roundf(value / desc.precision) as i32
}

/// Reduce a raw pot sample to an N-bit selector index.
///
/// `bits` outside 1..=ADC_BITS selects index 0 (logic default).
pub fn selector_with_pot(raw: u16, bits: u8) -> u16 {
    if bits == 0 || bits > ADC_BITS {
        return 0;
    }
    raw >> (ADC_BITS - bits)
}

/// Reduce an encoder pulse count to an N-bit selector index.
///
/// The encoder counts four edges per detent, so pulses are divided by four
/// before indexing; negative counts and zero-width selectors yield 0.
pub fn selector_with_encoder(pulses: i32, bits: u8) -> u16 {
    if pulses <= 0 || bits == 0 {
        return 0;
    }
    let index = (pulses >> 2) as u32;
    let max = (1u32 << bits) - 1;
    index.min(max) as u16
}

/// Map a raw pot sample linearly into `[min, max]`.
///
/// Ranges spanning zero split at the pot's center detent: the upper half
/// sweeps 0..max, the lower half sweeps 0..min.
pub fn pot_to_range(raw: u16, min: f32, max: f32) -> f32 {
    let full = (ADC_MAX + 1) as f32;
    let middle = full / 2.0;
    let raw = raw as f32;

    if min >= 0.0 || max <= 0.0 {
        raw * (max - min) / full + min
    } else if raw >= middle {
        (raw - middle) * (max / middle)
    } else {
        (middle - raw) * (min / middle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DESC: ParamDesc = ParamDesc {
        name: "test",
        min: -10.0,
        max: 10.0,
        precision: 0.5,
    };

    #[test]
    fn quantize_in_range_round_trips() {
        for pulses in [-20, -7, 0, 3, 20] {
            let q = quantize(pulses, &DESC);
            assert_eq!(q.saturation, Saturation::None);
            assert_eq!(pulses_for(q.value, &DESC), pulses);
        }
    }

    #[test]
    fn quantize_clamps_and_flags() {
        let q = quantize(21, &DESC);
        assert_eq!(q.value, 10.0);
        assert_eq!(q.saturation, Saturation::Positive);
        assert_eq!(pulses_for(q.value, &DESC), 20);

        let q = quantize(-1000, &DESC);
        assert_eq!(q.value, -10.0);
        assert_eq!(q.saturation, Saturation::Negative);
        assert_eq!(pulses_for(q.value, &DESC), -20);
    }

    #[test]
    fn quantize_round_trips_with_decimal_precision() {
        let desc = ParamDesc {
            name: "fine",
            min: 0.0,
            max: 100.0,
            precision: 0.1,
        };
        for pulses in [0, 1, 17, 333, 1000] {
            let q = quantize(pulses, &desc);
            assert_eq!(pulses_for(q.value, &desc), pulses);
        }
    }

    #[test]
    fn pot_selector_uses_top_bits() {
        // 2-bit selector: quarters of the ADC span.
        assert_eq!(selector_with_pot(0, 2), 0);
        assert_eq!(selector_with_pot(1023, 2), 0);
        assert_eq!(selector_with_pot(1024, 2), 1);
        assert_eq!(selector_with_pot(2048, 2), 2);
        assert_eq!(selector_with_pot(4095, 2), 3);

        // 1-bit: on/off halves.
        assert_eq!(selector_with_pot(2047, 1), 0);
        assert_eq!(selector_with_pot(2048, 1), 1);

        // Degenerate widths.
        assert_eq!(selector_with_pot(4095, 0), 0);
        assert_eq!(selector_with_pot(4095, 13), 0);
    }

    #[test]
    fn encoder_selector_quarters_pulses() {
        assert_eq!(selector_with_encoder(0, 2), 0);
        assert_eq!(selector_with_encoder(-8, 2), 0);
        assert_eq!(selector_with_encoder(4, 2), 1);
        assert_eq!(selector_with_encoder(8, 2), 2);
        // Clamped to the top index.
        assert_eq!(selector_with_encoder(1000, 2), 3);
        assert_eq!(selector_with_encoder(5, 1), 1);
    }

    #[test]
    fn pot_ranges() {
        // Non-negative range.
        assert_relative_eq!(pot_to_range(0, 0.0, 10.0), 0.0);
        assert_relative_eq!(pot_to_range(4096, 0.0, 10.0), 10.0);

        // Negative range.
        assert_relative_eq!(pot_to_range(0, -10.0, -2.0), -10.0);
        assert_relative_eq!(pot_to_range(4096, -10.0, -2.0), -2.0);

        // Range spanning zero: center detent at half scale.
        assert_relative_eq!(pot_to_range(2048, -5.0, 5.0), 0.0);
        assert_relative_eq!(pot_to_range(4096, -5.0, 5.0), 5.0);
        assert_relative_eq!(pot_to_range(0, -5.0, 5.0), -5.0);
    }
}
