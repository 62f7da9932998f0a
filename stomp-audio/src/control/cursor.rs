//! The tunable parameter table and the edit cursor.
//!
//! Eleven parameters cover the whole pedal: input gain, the six compressor
//! settings, the bright shelf (amount and pre/post placement), the hum
//! notch and the master volume. Each parameter stores its own encoder
//! pulse count; its value is always `pulses × precision`, clamped.

use crate::control::encoder::{quantize, Quantized};

/// Identity of one tunable parameter. Order matches the edit cursor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParamId {
    PreGain,
    Threshold,
    Ratio,
    Attack,
    Hold,
    Decay,
    BrightBoost,
    BrightPosition,
    MasterVolume,
    PostGain,
    NotchFreq,
}

/// Number of tunable parameters.
pub const PARAM_COUNT: usize = 11;

impl ParamId {
    /// All parameters in cursor order.
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::PreGain,
        ParamId::Threshold,
        ParamId::Ratio,
        ParamId::Attack,
        ParamId::Hold,
        ParamId::Decay,
        ParamId::BrightBoost,
        ParamId::BrightPosition,
        ParamId::MasterVolume,
        ParamId::PostGain,
        ParamId::NotchFreq,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`, clamped to the table.
    pub fn from_index(index: usize) -> ParamId {
        Self::ALL[index.min(PARAM_COUNT - 1)]
    }
}

/// Range and encoder step of one parameter.
pub struct ParamDesc {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    /// Value change per encoder pulse.
    pub precision: f32,
}

/// Descriptor for a parameter.
pub fn descriptor(id: ParamId) -> &'static ParamDesc {
    &DESCRIPTORS[id.index()]
}

static DESCRIPTORS: [ParamDesc; PARAM_COUNT] = [
    ParamDesc { name: "Pre gain", min: -30.0, max: 24.0, precision: 0.5 },
    ParamDesc { name: "Threshold", min: -90.0, max: 6.0, precision: 0.5 },
    ParamDesc { name: "Ratio", min: 1.0, max: 100.0, precision: 0.5 },
    ParamDesc { name: "Attack", min: 1.0, max: 500.0, precision: 1.0 },
    ParamDesc { name: "Hold", min: 1.0, max: 500.0, precision: 1.0 },
    ParamDesc { name: "Decay", min: 10.0, max: 2000.0, precision: 5.0 },
    ParamDesc { name: "Bright boost", min: -15.0, max: 15.0, precision: 0.5 },
    ParamDesc { name: "Bright position", min: 0.0, max: 1.0, precision: 1.0 },
    ParamDesc { name: "Master volume", min: -60.0, max: 6.0, precision: 0.5 },
    ParamDesc { name: "Post gain", min: -30.0, max: 24.0, precision: 0.5 },
    ParamDesc { name: "Notch freq", min: 20.0, max: 2000.0, precision: 5.0 },
];

/// Stored pulse counts for every parameter. Pulses written here are always
/// in range (edits clamp before storing).
pub struct ParamStore {
    pulses: [i32; PARAM_COUNT],
}

impl ParamStore {
    pub const fn new() -> Self {
        ParamStore {
            pulses: [0; PARAM_COUNT],
        }
    }

    pub fn pulses(&self, id: ParamId) -> i32 {
        self.pulses[id.index()]
    }

    pub fn set_pulses(&mut self, id: ParamId, pulses: i32) {
        self.pulses[id.index()] = pulses;
    }

    /// Quantized value of a stored parameter.
    pub fn quantized(&self, id: ParamId) -> Quantized {
        quantize(self.pulses(id), descriptor(id))
    }

    /// Current value of a stored parameter.
    pub fn value(&self, id: ParamId) -> f32 {
        self.quantized(id).value
    }
}

/// Selects which parameter the encoder currently edits.
///
/// Previous selection is tracked explicitly so callers can detect the
/// transition that requires reseeding the live pulse counter.
pub struct ParameterCursor {
    current: ParamId,
    previous: ParamId,
}

impl ParameterCursor {
    pub const fn new() -> Self {
        ParameterCursor {
            current: ParamId::PreGain,
            previous: ParamId::PreGain,
        }
    }

    pub fn current(&self) -> ParamId {
        self.current
    }

    pub fn previous(&self) -> ParamId {
        self.previous
    }

    /// Move the cursor. Returns true if the selection changed (the caller
    /// must resync the live pulse counter before the next quantization).
    pub fn select(&mut self, id: ParamId) -> bool {
        if id == self.current {
            return false;
        }
        self.previous = self.current;
        self.current = id;
        true
    }

    /// Jump back to the first parameter (used after preset application).
    pub fn reset(&mut self) {
        self.previous = self.current;
        self.current = ParamId::PreGain;
    }
}
