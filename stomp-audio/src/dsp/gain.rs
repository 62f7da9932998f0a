//! Scalar gain stage.

use crate::frame::FloatFrame;

/// Multiply every sample in the frame by a linear gain, in place.
///
/// Used for pre-gain, master volume, and the bypass path (gain = 1.0).
pub fn process(frame: &mut FloatFrame, gain: f32) {
    for pair in frame.s.iter_mut() {
        pair[0] *= gain;
        pair[1] *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_every_sample() {
        let mut frame = FloatFrame::silent();
        frame.s[0] = [0.5, -0.25];
        frame.s[63] = [1.0, -1.0];

        process(&mut frame, 2.0);
        assert_eq!(frame.s[0], [1.0, -0.5]);
        assert_eq!(frame.s[63], [2.0, -2.0]);
    }

    #[test]
    fn unity_gain_is_exact() {
        let mut frame = FloatFrame::silent();
        frame.s[1] = [0.123, -0.987];
        let before = frame;

        process(&mut frame, 1.0);
        assert_eq!(frame, before);
    }
}
