//! Second-order Butterworth tone filters for the reverb output stage.
//!
//! A thin wrapper over [`Biquad`] that fixes the Q factor at 1/√2 (the
//! maximally-flat Butterworth response) and remembers its cutoff, so a
//! sample-rate change can rebuild the coefficients from the stored value.
//!
//! The engines place one lowpass and one highpass per channel after the
//! reverb tail, shaping the wet signal before the stereo mix.

use crate::biquad::{Biquad, highpass_coefficients, lowpass_coefficients};
use crate::one_pole::FilterMode;

/// Butterworth Q: 1/sqrt(2), the maximally flat passband.
const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Second-order Butterworth lowpass or highpass filter.
///
/// # Example
///
/// ```rust
/// use stanza_core::Butterworth;
///
/// let mut lpf = Butterworth::lowpass(44100.0, 8000.0);
/// let out = lpf.process(1.0);
/// assert!(out.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Butterworth {
    biquad: Biquad,
    mode: FilterMode,
    cutoff: f32,
    sample_rate: f32,
}

impl Butterworth {
    /// Create a Butterworth lowpass at the given cutoff.
    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            biquad: Biquad::new(),
            mode: FilterMode::Lowpass,
            cutoff: cutoff_hz,
            sample_rate,
        };
        filter.recalculate();
        filter
    }

    /// Create a Butterworth highpass at the given cutoff.
    pub fn highpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            biquad: Biquad::new(),
            mode: FilterMode::Highpass,
            cutoff: cutoff_hz,
            sample_rate,
        };
        filter.recalculate();
        filter
    }

    /// Set the cutoff frequency in Hz.
    ///
    /// Clamped to [10, sample_rate/2 * 0.99] to keep the coefficients stable.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff = cutoff_hz.clamp(10.0, self.sample_rate * 0.495);
        self.recalculate();
    }

    /// Current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Update sample rate; coefficients are rebuilt from the stored cutoff
    /// and the state is cleared.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.min(sample_rate * 0.495);
        self.biquad.clear();
        self.recalculate();
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }

    /// Clear the filter state.
    pub fn reset(&mut self) {
        self.biquad.clear();
    }

    fn recalculate(&mut self) {
        let (b0, b1, b2, a0, a1, a2) = match self.mode {
            FilterMode::Lowpass => {
                lowpass_coefficients(self.cutoff, BUTTERWORTH_Q, self.sample_rate)
            }
            FilterMode::Highpass => {
                highpass_coefficients(self.cutoff, BUTTERWORTH_Q, self.sample_rate)
            }
        };
        self.biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
    }
}
