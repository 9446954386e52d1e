//! Control-value mapping between normalized and physical ranges.
//!
//! Hosts hand parameters over as normalized values in [0, 1]; the DSP wants
//! Hz, seconds and milliseconds. These maps convert in both directions and
//! are exact inverses of each other, so a set followed by a get returns the
//! value that was set.
//!
//! Also home to the two laws every reverb engine shares:
//!
//! - [`decay_to_feedback`] — the −60 dB reverberation-time law that turns a
//!   decay time into a per-line feedback gain.
//! - [`StereoMix`] — the equal-power wet/dry/width output mix.

use libm::{expf, logf, powf};

/// Linearly map a normalized value in [0, 1] to [min, max].
#[inline]
pub fn map_linear(norm: f32, min: f32, max: f32) -> f32 {
    min + norm.clamp(0.0, 1.0) * (max - min)
}

/// Inverse of [`map_linear`]: recover the normalized value from a physical
/// one. Degenerate ranges (min == max) map to 0.
#[inline]
pub fn unmap_linear(value: f32, min: f32, max: f32) -> f32 {
    if max == min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Logarithmically map a normalized value in [0, 1] to [min, max].
///
/// Equal normalized steps cover equal frequency ratios, which matches how
/// cutoff frequencies are perceived. Both bounds must be positive.
#[inline]
pub fn map_log(norm: f32, min: f32, max: f32) -> f32 {
    let min = min.max(1e-6);
    let max = max.max(min);
    let ln_min = logf(min);
    let ln_max = logf(max);
    expf(ln_min + norm.clamp(0.0, 1.0) * (ln_max - ln_min))
}

/// Inverse of [`map_log`].
#[inline]
pub fn unmap_log(value: f32, min: f32, max: f32) -> f32 {
    let min = min.max(1e-6);
    let max = max.max(min);
    let ln_min = logf(min);
    let ln_max = logf(max);
    if ln_max == ln_min {
        return 0.0;
    }
    ((logf(value.max(1e-6)) - ln_min) / (ln_max - ln_min)).clamp(0.0, 1.0)
}

/// Feedback gain for a recirculating delay so its tail falls by 60 dB over
/// `decay_secs`.
///
/// `g = 10^(−3 · delay_samples / (decay_secs · sample_rate))`
///
/// After `decay_secs / (delay_samples / sample_rate)` round trips the
/// accumulated gain is `10^−3` = −60 dB. The decay time is floored at 1 ms
/// so the result is always finite and strictly below 1 for any positive
/// delay length.
#[inline]
pub fn decay_to_feedback(delay_samples: f32, decay_secs: f32, sample_rate: f32) -> f32 {
    let decay = decay_secs.max(0.001);
    powf(10.0, -3.0 * delay_samples / (decay * sample_rate))
}

/// Equal-power wet/dry/width output mix.
///
/// Derived once per parameter change from the wet amount and the stereo
/// spread, then applied per frame:
///
/// ```text
/// width = 2*spread - 1
/// wet1  = wet * (width/2 + 0.5)    same-channel wet gain
/// wet2  = wet * (1 - width) / 2    cross-channel wet gain
/// dry   = 1 - wet
/// ```
///
/// At spread = 1 the channels stay fully separate (wet2 = 0); at spread = 0.5
/// each output gets equal parts of both wet channels; at spread = 0 the wet
/// image collapses to mono with the channels swapped into each other equally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoMix {
    /// Same-channel wet gain
    pub wet1: f32,
    /// Cross-channel wet gain
    pub wet2: f32,
    /// Dry gain
    pub dry: f32,
}

impl StereoMix {
    /// Derive the mix gains from wet amount and stereo spread, both in [0, 1].
    pub fn from_wet_spread(wet: f32, spread: f32) -> Self {
        let wet = wet.clamp(0.0, 1.0);
        let spread = spread.clamp(0.0, 1.0);
        let width = 2.0 * spread - 1.0;
        Self {
            wet1: wet * (width / 2.0 + 0.5),
            wet2: wet * (1.0 - width) / 2.0,
            dry: 1.0 - wet,
        }
    }

    /// Apply the mix to one stereo frame of wet signal plus the dry input.
    #[inline]
    pub fn mix(&self, wet_l: f32, wet_r: f32, dry_l: f32, dry_r: f32) -> (f32, f32) {
        let out_l = self.wet1 * wet_l + self.wet2 * wet_r + self.dry * dry_l;
        let out_r = self.wet1 * wet_r + self.wet2 * wet_l + self.dry * dry_r;
        (out_l, out_r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn linear_map_endpoints() {
        assert_eq!(map_linear(0.0, 100.0, 200.0), 100.0);
        assert_eq!(map_linear(1.0, 100.0, 200.0), 200.0);
        assert_eq!(map_linear(0.5, 100.0, 200.0), 150.0);
        // Out-of-range normalized values clamp
        assert_eq!(map_linear(2.0, 100.0, 200.0), 200.0);
    }

    #[test]
    fn log_map_endpoints() {
        let v0 = map_log(0.0, 20.0, 20000.0);
        let v1 = map_log(1.0, 20.0, 20000.0);
        assert!((v0 - 20.0).abs() < 0.01);
        assert!((v1 - 20000.0).abs() < 1.0);

        // Midpoint of a log map is the geometric mean
        let mid = map_log(0.5, 20.0, 20000.0);
        let geo = libm::sqrtf(20.0 * 20000.0);
        assert!((mid - geo).abs() / geo < 0.001, "mid = {mid}, geo = {geo}");
    }

    #[test]
    fn degenerate_ranges() {
        assert_eq!(unmap_linear(5.0, 5.0, 5.0), 0.0);
        assert_eq!(unmap_log(100.0, 100.0, 100.0), 0.0);
    }

    #[test]
    fn decay_law_known_value() {
        // Delay of one full decay period: g = 10^-3
        let g = decay_to_feedback(44100.0, 1.0, 44100.0);
        assert!((g - 0.001).abs() < 1e-6);

        // 50ms line, 2s decay at 44.1k
        let g = decay_to_feedback(0.05 * 44100.0, 2.0, 44100.0);
        let expected = powf(10.0, -3.0 * 0.05 / 2.0);
        assert!((g - expected).abs() < 1e-6);
        assert!(g < 1.0);
    }

    #[test]
    fn decay_law_zero_decay_is_finite() {
        let g = decay_to_feedback(4410.0, 0.0, 44100.0);
        assert!(g.is_finite());
        assert!(g < 1.0);
    }

    #[test]
    fn mix_full_spread_keeps_channels_separate() {
        let mix = StereoMix::from_wet_spread(1.0, 1.0);
        assert!((mix.wet1 - 1.0).abs() < 1e-6);
        assert!(mix.wet2.abs() < 1e-6);
        assert!(mix.dry.abs() < 1e-6);

        let (l, r) = mix.mix(0.8, -0.3, 0.0, 0.0);
        assert!((l - 0.8).abs() < 1e-6);
        assert!((r + 0.3).abs() < 1e-6);
    }

    #[test]
    fn mix_half_spread_collapses_to_mono() {
        // spread = 0.5 -> width = 0 -> wet1 = wet2 = wet/2
        let mix = StereoMix::from_wet_spread(1.0, 0.5);
        assert!((mix.wet1 - 0.5).abs() < 1e-6);
        assert!((mix.wet2 - 0.5).abs() < 1e-6);

        let (l, r) = mix.mix(0.8, -0.3, 0.0, 0.0);
        assert!((l - r).abs() < 1e-6, "Channels should be identical");
    }

    #[test]
    fn mix_dry_passthrough_at_zero_wet() {
        let mix = StereoMix::from_wet_spread(0.0, 0.7);
        let (l, r) = mix.mix(1.0, 1.0, 0.25, -0.5);
        assert!((l - 0.25).abs() < 1e-6);
        assert!((r + 0.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn linear_roundtrip(norm in 0.0f32..=1.0) {
            let value = map_linear(norm, 0.1, 10.0);
            let back = unmap_linear(value, 0.1, 10.0);
            prop_assert!((norm - back).abs() < 1e-5);
        }

        #[test]
        fn log_roundtrip(norm in 0.0f32..=1.0) {
            let value = map_log(norm, 20.0, 20000.0);
            let back = unmap_log(value, 20.0, 20000.0);
            prop_assert!((norm - back).abs() < 1e-4);
        }

        #[test]
        fn decay_feedback_in_unit_interval(
            delay in 1.0f32..48000.0,
            decay in 0.01f32..10.0,
        ) {
            let g = decay_to_feedback(delay, decay, 48000.0);
            prop_assert!(g > 0.0);
            prop_assert!(g < 1.0);
        }

        #[test]
        fn mix_gains_bounded(wet in 0.0f32..=1.0, spread in 0.0f32..=1.0) {
            let mix = StereoMix::from_wet_spread(wet, spread);
            prop_assert!(mix.wet1 >= 0.0 && mix.wet1 <= 1.0);
            prop_assert!(mix.wet2 >= 0.0 && mix.wet2 <= 1.0);
            prop_assert!(mix.dry >= 0.0 && mix.dry <= 1.0);
            // Total wet energy never exceeds the wet amount
            prop_assert!(mix.wet1 + mix.wet2 <= wet + 1e-6);
        }
    }
}
