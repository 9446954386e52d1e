//! Core StereoEffect trait.
//!
//! The [`StereoEffect`] trait is the processing contract both reverb
//! engines implement: two channels in, two channels out, sample-synchronous.
//!
//! ## Design Decisions
//!
//! - **Stereo processing**: Reverbs are inherently stereo devices — the
//!   spread control and cross-channel mixing need both channels at once,
//!   so the trait works on frames rather than independent mono streams.
//!
//! - **Object-safe**: `dyn StereoEffect` works for runtime chaining, but
//!   static dispatch is preferred for performance.
//!
//! - **No allocations**: All methods are designed to be called in real-time
//!   audio contexts with zero heap allocations.

/// Core trait for stereo audio effects.
///
/// # Example
///
/// ```rust
/// use stanza_core::StereoEffect;
///
/// struct Swap;
///
/// impl StereoEffect for Swap {
///     fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (right, left)
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait StereoEffect {
    /// Process a single stereo frame.
    ///
    /// For effects with internal state this advances the state by exactly
    /// one sample.
    ///
    /// # Arguments
    /// * `left`, `right` - Input samples, typically in range [-1.0, 1.0]
    ///
    /// # Returns
    /// The processed (left, right) output frame.
    fn process(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process a block of frames.
    ///
    /// Default implementation calls `process()` per frame. Implementations
    /// may override for more efficient block processing. All four slices
    /// must have the same length; exactly that many frames are produced.
    ///
    /// # Panics
    /// Default implementation debug-panics on mismatched buffer lengths.
    fn process_block(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        debug_assert_eq!(in_left.len(), in_right.len());
        debug_assert_eq!(in_left.len(), out_left.len());
        debug_assert_eq!(in_left.len(), out_right.len());
        for i in 0..in_left.len() {
            let (l, r) = self.process(in_left[i], in_right[i]);
            out_left[i] = l;
            out_right[i] = r;
        }
    }

    /// Update the sample rate.
    ///
    /// Implementations recalculate every sample-rate-dependent quantity
    /// (delay lengths, filter coefficients, LFO increments) from their
    /// canonical millisecond/Hz values.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state.
    ///
    /// Clears delay lines and filter history without changing parameters.
    fn reset(&mut self);

    /// Report processing latency in samples.
    ///
    /// Used for latency compensation in hosts. Reverbs report their
    /// pre-delay here; most other effects return zero.
    fn latency_samples(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Attenuate {
        gain: f32,
    }

    impl StereoEffect for Attenuate {
        fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
            (left * self.gain, right * self.gain)
        }

        fn set_sample_rate(&mut self, _sample_rate: f32) {}

        fn reset(&mut self) {}
    }

    #[test]
    fn test_process_block_default() {
        let mut fx = Attenuate { gain: 0.5 };

        let in_l = [1.0, 2.0, 3.0];
        let in_r = [-1.0, -2.0, -3.0];
        let mut out_l = [0.0; 3];
        let mut out_r = [0.0; 3];

        fx.process_block(&in_l, &in_r, &mut out_l, &mut out_r);

        assert_eq!(out_l, [0.5, 1.0, 1.5]);
        assert_eq!(out_r, [-0.5, -1.0, -1.5]);
    }

    #[test]
    fn test_default_latency_is_zero() {
        let fx = Attenuate { gain: 1.0 };
        assert_eq!(fx.latency_samples(), 0);
    }

    #[test]
    fn test_object_safety() {
        let mut fx: Box<dyn StereoEffect> = Box::new(Attenuate { gain: 2.0 });
        let (l, r) = fx.process(0.25, -0.25);
        assert_eq!((l, r), (0.5, -0.5));
    }
}
