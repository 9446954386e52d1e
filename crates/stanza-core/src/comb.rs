//! Damped feedback comb filter, the body of a reverb tail.
//!
//! A comb filter with a [`DampingFilter`] inside the feedback loop and a
//! signed feedback gain. A bank of these at mutually prime delay lengths,
//! with alternating feedback signs, produces the dense modal response of a
//! Schroeder reverb. With feedback zero the same structure is a plain
//! pre-delay.

use crate::damping::{DampingFilter, DampingKind};
use crate::delay::DelayLine;
use crate::flush_denormal;
use crate::mapping::decay_to_feedback;
use crate::math::db_to_linear;

/// Comb filter with damping, signed feedback and makeup gain.
///
/// The feedback path includes a damping filter, simulating the absorption
/// of high frequencies in real acoustic spaces. The feedback gain may be
/// negative; alternating signs across a comb bank spreads the modal peaks
/// apart and reduces coloration.
///
/// The decay time, once set through [`CombFilter::set_feedback_from_decay`],
/// is remembered: changing the delay length or sample rate re-derives the
/// feedback gain so the audible decay time is preserved.
///
/// # Example
///
/// ```rust
/// use stanza_core::CombFilter;
///
/// let mut comb = CombFilter::new(100.0, 44100.0);
/// comb.set_delay_ms(29.7);
/// comb.set_feedback_from_decay(1.5);
///
/// let output = comb.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: DelayLine,
    damping: DampingFilter,
    feedback: f32,
    /// Decay time the feedback was derived from, if any
    decay_secs: Option<f32>,
    makeup: f32,
    sample_rate: f32,
}

impl CombFilter {
    /// Create a comb filter with the given maximum delay time.
    ///
    /// Starts with feedback 0 (a pure delay), no damping to speak of
    /// (cutoff near Nyquist) and unity makeup gain.
    ///
    /// # Panics
    ///
    /// Panics if the maximum delay would produce a zero-capacity buffer.
    pub fn new(max_delay_ms: f32, sample_rate: f32) -> Self {
        Self {
            delay: DelayLine::new(max_delay_ms, sample_rate),
            damping: DampingFilter::new(sample_rate, sample_rate * 0.495, DampingKind::OnePole),
            feedback: 0.0,
            decay_secs: None,
            makeup: 1.0,
            sample_rate,
        }
    }

    /// Set the feedback gain directly, clamped to |g| <= 0.99.
    ///
    /// Forgets any stored decay time.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
        self.decay_secs = None;
    }

    /// Current feedback gain (signed).
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Derive the feedback magnitude from a decay time via the −60 dB law,
    /// preserving the current feedback sign.
    ///
    /// The decay time is stored; subsequent delay-length or sample-rate
    /// changes re-derive the gain from it.
    pub fn set_feedback_from_decay(&mut self, decay_secs: f32) {
        self.decay_secs = Some(decay_secs);
        self.rederive_feedback();
    }

    /// Flip the feedback sign. Used to alternate signs across a comb bank.
    pub fn negate_feedback(&mut self) {
        self.feedback = -self.feedback;
    }

    /// Set the damping cutoff frequency in Hz.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.damping.set_cutoff(cutoff_hz);
    }

    /// Switch the damping topology.
    pub fn set_damping_kind(&mut self, kind: DampingKind) {
        self.damping.set_kind(kind);
    }

    /// Set the makeup gain in dB, applied to the output.
    pub fn set_makeup_db(&mut self, db: f32) {
        self.makeup = db_to_linear(db);
    }

    /// Set the delay length in milliseconds (clamped to capacity).
    ///
    /// If a decay time is stored, the feedback gain is re-derived so the
    /// decay time stays the same at the new length.
    pub fn set_delay_ms(&mut self, ms: f32) {
        self.delay.set_delay_ms(ms);
        self.rederive_feedback();
    }

    /// Current delay length in milliseconds.
    pub fn delay_ms(&self) -> f32 {
        self.delay.delay_ms()
    }

    /// Process a single sample.
    ///
    /// The delayed signal is damped, fed back into the line with the input,
    /// and returned with makeup gain applied.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read_nominal();
        let damped = self.damping.process(delayed);
        self.delay
            .write(flush_denormal(input + damped * self.feedback));
        damped * self.makeup
    }

    /// Clear the delay line and damping state.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.damping.reset();
    }

    /// Update the sample rate. The delay reallocates for the same maximum
    /// time in ms, the damping coefficient is rebuilt and the feedback is
    /// re-derived from the stored decay.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.delay.set_sample_rate(sample_rate);
        self.damping.set_sample_rate(sample_rate);
        self.rederive_feedback();
    }

    fn rederive_feedback(&mut self) {
        if let Some(decay) = self.decay_secs {
            let sign = if self.feedback < 0.0 { -1.0 } else { 1.0 };
            let g = decay_to_feedback(self.delay.delay_samples(), decay, self.sample_rate);
            self.feedback = sign * g.min(0.99);
        }
    }
}
