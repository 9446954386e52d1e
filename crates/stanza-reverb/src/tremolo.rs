//! Tremolo stage for the reverb tail.
//!
//! Amplitude modulation applied after the tone filters: one gain value per
//! frame, applied to both channels so the stereo image does not wobble.

use stanza_core::{Lfo, LfoWaveform, SmoothedParam, StereoEffect};

use crate::{MAX_MOD_RATE_HZ, MIN_MOD_RATE_HZ};

/// Amplitude modulation effect.
///
/// The gain stays in `[1 - depth, 1]`: at depth 0 the stage is a bypass,
/// at depth 1 the signal is fully choked at the LFO trough. Rate and depth
/// are smoothed so control-rate changes never click.
///
/// # Example
///
/// ```rust
/// use stanza_core::StereoEffect;
/// use stanza_reverb::Tremolo;
///
/// let mut trem = Tremolo::new(48000.0);
/// trem.set_rate_hz(3.0);
/// trem.set_depth(0.8);
///
/// let (l, r) = trem.process(0.5, -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Tremolo {
    lfo: Lfo,
    rate_hz: SmoothedParam,
    depth: SmoothedParam,
}

impl Tremolo {
    /// Create a tremolo at the given sample rate.
    ///
    /// Defaults: 1 Hz sine, depth 0 (bypass).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(sample_rate, 1.0),
            rate_hz: SmoothedParam::with_config(1.0, sample_rate, 20.0),
            depth: SmoothedParam::with_config(0.0, sample_rate, 20.0),
        }
    }

    /// Set modulation rate in Hz, clamped to 0.1–10 Hz.
    pub fn set_rate_hz(&mut self, rate_hz: f32) {
        self.rate_hz
            .set_target(rate_hz.clamp(MIN_MOD_RATE_HZ, MAX_MOD_RATE_HZ));
    }

    /// Get the modulation rate target in Hz.
    pub fn rate_hz(&self) -> f32 {
        self.rate_hz.target()
    }

    /// Set modulation depth, clamped to 0–1.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Get the modulation depth target.
    pub fn depth(&self) -> f32 {
        self.depth.target()
    }

    /// Set the LFO waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.lfo.set_waveform(waveform);
    }

    /// Advance one sample and return the gain for this frame.
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        let rate = self.rate_hz.advance();
        self.lfo.set_frequency(rate);
        let depth = self.depth.advance();
        1.0 - depth * (1.0 - self.lfo.next_unipolar())
    }
}

impl StereoEffect for Tremolo {
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let gain = self.next_gain();
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.lfo.set_sample_rate(sample_rate);
        self.rate_hz.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.rate_hz.snap_to_target();
        self.depth.snap_to_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_is_bypass() {
        let mut trem = Tremolo::new(48000.0);
        trem.set_depth(0.0);
        trem.reset();

        for _ in 0..1000 {
            let (l, r) = trem.process(0.5, -0.25);
            assert!((l - 0.5).abs() < 1e-6);
            assert!((r + 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn gain_stays_within_depth_range() {
        let mut trem = Tremolo::new(48000.0);
        trem.set_rate_hz(5.0);
        trem.set_depth(0.8);
        trem.reset();

        for _ in 0..48000 {
            let gain = trem.next_gain();
            assert!(gain >= 0.2 - 1e-4 && gain <= 1.0 + 1e-4, "gain {gain}");
        }
    }

    #[test]
    fn same_gain_on_both_channels() {
        let mut trem = Tremolo::new(48000.0);
        trem.set_rate_hz(3.0);
        trem.set_depth(1.0);
        trem.reset();

        for _ in 0..4800 {
            let (l, r) = trem.process(1.0, 1.0);
            assert_eq!(l, r, "channels must share one gain per frame");
        }
    }

    #[test]
    fn rate_clamped_to_supported_band() {
        let mut trem = Tremolo::new(48000.0);

        trem.set_rate_hz(100.0);
        assert_eq!(trem.rate_hz(), MAX_MOD_RATE_HZ);

        trem.set_rate_hz(0.0);
        assert_eq!(trem.rate_hz(), MIN_MOD_RATE_HZ);
    }

    #[test]
    fn full_depth_reaches_silence_at_trough() {
        let mut trem = Tremolo::new(48000.0);
        trem.set_rate_hz(1.0);
        trem.set_depth(1.0);
        trem.reset();

        let mut min_gain = f32::MAX;
        for _ in 0..48000 {
            min_gain = min_gain.min(trem.next_gain());
        }
        assert!(min_gain < 0.01, "trough gain {min_gain}");
    }
}
