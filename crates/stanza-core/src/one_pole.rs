//! One-pole filter for damping and tone shaping.
//!
//! A single-pole IIR with the lowpass difference equation:
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`. The highpass response is
//! formed by subtraction: `hp[n] = x[n] - lp[n]`.
//!
//! This is the simplest possible filter — 6 dB/octave rolloff, zero latency,
//! one multiply per sample. In a reverb it lives inside the feedback loops,
//! where the frequency-dependent loss of air and walls is modeled by rolling
//! off highs a little more on every pass.
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio
//! Applications", Section: One-Pole Filter.

use crate::flush_denormal;
use libm::expf;

/// Response of a [`OnePole`] filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// 6 dB/oct lowpass
    #[default]
    Lowpass,
    /// 6 dB/oct highpass (input minus lowpass)
    Highpass,
}

/// One-pole (6 dB/oct) filter, switchable lowpass/highpass.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
    mode: FilterMode,
}

impl OnePole {
    /// Create a new one-pole lowpass filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq_hz` - Cutoff frequency in Hz (20.0 to sample_rate/2)
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
            mode: FilterMode::Lowpass,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Create a one-pole highpass filter.
    pub fn highpass(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, freq_hz);
        filter.mode = FilterMode::Highpass;
        filter
    }

    /// Switch the filter response without resetting state.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Set the cutoff frequency and recalculate the coefficient.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_coeff();
    }

    /// Current cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // y[n] = x[n] + coeff * (y[n-1] - x[n])
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        match self.mode {
            FilterMode::Lowpass => self.state,
            FilterMode::Highpass => input - self.state,
        }
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Update sample rate, recalculate the coefficient and reset state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.state = 0.0;
        self.recalculate_coeff();
    }

    /// Recalculate the one-pole coefficient from frequency and sample rate.
    ///
    /// `coeff = exp(-2π * freq / sample_rate)`. At freq = 0, coeff ≈ 1
    /// (full filter). At Nyquist, coeff ≈ 0 (no filter).
    fn recalculate_coeff(&mut self) {
        self.coeff = expf(-core::f32::consts::TAU * self.freq / self.sample_rate);
    }
}
