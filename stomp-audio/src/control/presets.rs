//! Compiled-in presets.
//!
//! A preset is an immutable bundle of target values for all eleven tunable
//! parameters, selected by index from the preset knob. Applying one
//! overwrites every stored parameter and forces a full coefficient
//! recomputation.

use crate::control::cursor::ParamId;

/// Number of selectable presets (2-bit preset selector).
pub const PRESET_COUNT: usize = 4;

/// Target values for every tunable parameter.
pub struct Preset {
    pub name: &'static str,
    pub pre_gain_db: f32,
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_ms: f32,
    pub hold_ms: f32,
    pub decay_ms: f32,
    pub bright_boost_db: f32,
    /// False places the bright shelf before the compressor, true after.
    pub bright_post: bool,
    pub master_db: f32,
    pub post_gain_db: f32,
    pub notch_hz: f32,
}

impl Preset {
    /// Target value of one parameter.
    pub fn value(&self, id: ParamId) -> f32 {
        match id {
            ParamId::PreGain => self.pre_gain_db,
            ParamId::Threshold => self.threshold_db,
            ParamId::Ratio => self.ratio,
            ParamId::Attack => self.attack_ms,
            ParamId::Hold => self.hold_ms,
            ParamId::Decay => self.decay_ms,
            ParamId::BrightBoost => self.bright_boost_db,
            ParamId::BrightPosition => {
                if self.bright_post {
                    1.0
                } else {
                    0.0
                }
            }
            ParamId::MasterVolume => self.master_db,
            ParamId::PostGain => self.post_gain_db,
            ParamId::NotchFreq => self.notch_hz,
        }
    }
}

/// Preset for a selector index; out-of-table indices clamp to the last.
pub fn preset(index: u16) -> &'static Preset {
    &PRESETS[(index as usize).min(PRESET_COUNT - 1)]
}

pub static PRESETS: [Preset; PRESET_COUNT] = [
    Preset {
        name: "Flat",
        pre_gain_db: 0.0,
        threshold_db: 0.0,
        ratio: 1.0,
        attack_ms: 10.0,
        hold_ms: 1.0,
        decay_ms: 100.0,
        bright_boost_db: 0.0,
        bright_post: false,
        master_db: 0.0,
        post_gain_db: 0.0,
        notch_hz: 20.0,
    },
    Preset {
        name: "Funky electric guitar",
        pre_gain_db: 0.0,
        threshold_db: -30.0,
        ratio: 4.0,
        attack_ms: 53.0,
        hold_ms: 10.0,
        decay_ms: 500.0,
        bright_boost_db: 0.0,
        bright_post: true,
        master_db: 0.0,
        post_gain_db: 6.0,
        notch_hz: 20.0,
    },
    Preset {
        name: "Slap bass",
        pre_gain_db: 3.0,
        threshold_db: -24.0,
        ratio: 8.0,
        attack_ms: 5.0,
        hold_ms: 5.0,
        decay_ms: 200.0,
        bright_boost_db: 6.0,
        bright_post: false,
        master_db: -3.0,
        post_gain_db: 9.0,
        notch_hz: 45.0,
    },
    Preset {
        name: "Country clean",
        pre_gain_db: 0.0,
        threshold_db: -20.0,
        ratio: 3.0,
        attack_ms: 20.0,
        hold_ms: 10.0,
        decay_ms: 800.0,
        bright_boost_db: 4.5,
        bright_post: true,
        master_db: 0.0,
        post_gain_db: 3.0,
        notch_hz: 60.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::cursor::{descriptor, ParamId};

    #[test]
    fn every_preset_value_is_in_range() {
        for preset in PRESETS.iter() {
            for id in ParamId::ALL {
                let desc = descriptor(id);
                let v = preset.value(id);
                assert!(
                    v >= desc.min && v <= desc.max,
                    "{}: {} = {} outside [{}, {}]",
                    preset.name,
                    desc.name,
                    v,
                    desc.min,
                    desc.max
                );
            }
        }
    }

    #[test]
    fn selector_clamps_to_table() {
        assert_eq!(preset(0).name, "Flat");
        assert_eq!(preset(3).name, "Country clean");
        assert_eq!(preset(100).name, "Country clean");
    }
}
