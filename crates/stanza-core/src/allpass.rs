//! Allpass filter for reverb diffusion.
//!
//! A Schroeder allpass that adds diffusion without coloring the frequency
//! response. Chains of these "smear" the impulse response before and after
//! the comb bank, turning discrete echoes into a dense tail.

use crate::delay::DelayLine;
use crate::flush_denormal;

/// Maximum smearing (feedback magnitude) the filter accepts. Above this the
/// diffuser starts ringing audibly, so the setter clamps here.
pub const MAX_SMEARING: f32 = 0.97;

/// Schroeder allpass filter for diffusion.
///
/// Passes all frequencies at equal amplitude while modifying the phase.
/// The structure is the one-multiply lattice form:
///
/// ```text
/// v[n] = x[n] + g * v[n-D]
/// y[n] = -g * v[n] + v[n-D]
/// ```
///
/// where `D` is the delay length and `g` is the smearing amount.
/// Unity magnitude response for any |g| < 1.
///
/// # Example
///
/// ```rust
/// use stanza_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(5.0, 44100.0);
/// allpass.set_feedback(0.7);
///
/// let output = allpass.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: DelayLine,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with the given maximum delay time.
    ///
    /// # Panics
    ///
    /// Panics if the maximum delay would produce a zero-capacity buffer.
    pub fn new(max_delay_ms: f32, sample_rate: f32) -> Self {
        Self {
            delay: DelayLine::new(max_delay_ms, sample_rate),
            feedback: 0.5,
        }
    }

    /// Set the smearing amount, clamped to |g| <= [`MAX_SMEARING`].
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-MAX_SMEARING, MAX_SMEARING);
    }

    /// Current smearing amount.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the delay length in milliseconds (clamped to capacity).
    pub fn set_delay_ms(&mut self, ms: f32) {
        self.delay.set_delay_ms(ms);
    }

    /// Current delay length in milliseconds.
    pub fn delay_ms(&self) -> f32 {
        self.delay.delay_ms()
    }

    /// Process a single sample through the allpass structure.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read_nominal();

        let v = flush_denormal(input + delayed * self.feedback);
        self.delay.write(v);

        -self.feedback * v + delayed
    }

    /// Clear the internal delay line.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Update the sample rate; the delay reallocates to keep the same
    /// maximum time in milliseconds.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.delay.set_sample_rate(sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allpass_basic() {
        let mut allpass = AllpassFilter::new(100.0, 1000.0);
        allpass.set_feedback(0.5);

        for _ in 0..200 {
            let out = allpass.process(0.5);
            assert!(out.is_finite());
        }
    }

    #[test]
    fn test_allpass_impulse_response() {
        let mut allpass = AllpassFilter::new(10.0, 1000.0);
        allpass.set_delay_ms(10.0);
        allpass.set_feedback(0.5);

        // Direct path: -g * input
        let first = allpass.process(1.0);
        assert!(
            (first - (-0.5)).abs() < 0.01,
            "First output should be -g * input, got {first}"
        );

        for _ in 0..9 {
            allpass.process(0.0);
        }

        // Delayed impulse: (1 - g^2) of the input
        let delayed = allpass.process(0.0);
        assert!(
            (delayed - 0.75).abs() < 0.01,
            "Expected 1 - g^2 = 0.75, got {delayed}"
        );
    }

    #[test]
    fn test_allpass_unity_magnitude() {
        // Drive with a steady sine and compare steady-state output amplitude
        // to input amplitude. An allpass must pass it at unity gain.
        let sample_rate = 1000.0;
        let mut allpass = AllpassFilter::new(7.0, sample_rate);
        allpass.set_delay_ms(7.0);
        allpass.set_feedback(0.7);

        let freq = 50.0;
        let mut peak = 0.0f32;
        let total = 4000;
        for i in 0..total {
            let x = libm::sinf(i as f32 * core::f32::consts::TAU * freq / sample_rate);
            let y = allpass.process(x);
            if i > total / 2 {
                peak = peak.max(y.abs());
            }
        }

        assert!(
            (peak - 1.0).abs() < 0.05,
            "Allpass should be unity gain, steady-state peak = {peak}"
        );
    }

    #[test]
    fn test_smearing_clamp() {
        let mut allpass = AllpassFilter::new(10.0, 1000.0);
        allpass.set_feedback(1.5);
        assert_eq!(allpass.feedback(), MAX_SMEARING);
        allpass.set_feedback(-1.5);
        assert_eq!(allpass.feedback(), -MAX_SMEARING);
    }

    #[test]
    fn test_allpass_clear() {
        let mut allpass = AllpassFilter::new(10.0, 1000.0);

        for _ in 0..20 {
            allpass.process(1.0);
        }

        allpass.clear();

        let out = allpass.process(0.0);
        assert!(out.abs() < 1e-10, "Should be silent after clear");
    }

    #[test]
    fn test_no_denormals_after_silence() {
        let mut allpass = AllpassFilter::new(100.0, 1000.0);
        allpass.set_feedback(0.9);

        for _ in 0..1000 {
            allpass.process(0.5);
        }

        // Silence in, clean decay out: nothing in the loop may fall into
        // the IEEE 754 subnormal range.
        for i in 0..100_000 {
            let out = allpass.process(0.0);
            assert!(
                out == 0.0 || out.abs() > f32::MIN_POSITIVE,
                "Denormal detected at sample {}: {:.2e}",
                i,
                out
            );
        }
    }
}
