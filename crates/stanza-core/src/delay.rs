//! Circular delay line, the storage element behind every reverb stage.
//!
//! A reverb is delay lines all the way down: pre-delay, comb filters,
//! allpass diffusers and FDN lines all wrap a [`DelayLine`]. The line is
//! millisecond-addressable — the nominal length is stored in milliseconds
//! and converted to samples on demand, so a sample-rate change reproduces
//! the same acoustic timing at the new rate.
//!
//! # Interpolation
//!
//! Fractional delay times interpolate between neighboring samples.
//! Linear interpolation (the default) never exceeds unity gain, so it is
//! the only safe choice inside a feedback loop: the loop gain stays
//! bounded by the feedback coefficient at every frequency. Cubic reads
//! are smoother for modulated taps but overshoot unity near Nyquist, so
//! they belong on open (non-recirculating) taps only.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::math::ms_to_samples;

/// Interpolation method for fractional delay reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// No interpolation (truncate to nearest sample)
    None,
    /// Linear interpolation between two samples. Gain never exceeds
    /// unity, safe inside feedback loops.
    #[default]
    Linear,
    /// Cubic interpolation (4-point, smoother for modulated reads).
    /// Overshoots unity gain near Nyquist: open taps only, never in a
    /// recirculating path.
    Cubic,
}

/// Variable-length delay line using a circular buffer (heap-allocated).
///
/// Capacity is fixed at construction from a maximum delay in milliseconds;
/// the current length can be set anywhere up to that capacity. Lengths are
/// stored canonically in milliseconds.
///
/// # Memory
///
/// The buffer is heap-allocated during construction and only reallocates
/// in [`DelayLine::set_sample_rate`]. No allocations occur during audio
/// processing.
///
/// # Example
///
/// ```rust
/// use stanza_core::DelayLine;
///
/// let mut delay = DelayLine::new(50.0, 44100.0);
/// delay.set_delay_ms(10.5);
///
/// delay.write(1.0);
/// let out = delay.read(delay.delay_samples());
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Write position in buffer
    write_pos: usize,
    /// Current nominal delay in milliseconds
    delay_ms: f32,
    /// Maximum delay in milliseconds (fixes the capacity)
    max_delay_ms: f32,
    sample_rate: f32,
    interpolation: Interpolation,
}

impl DelayLine {
    /// Creates a delay line with the given maximum delay time.
    ///
    /// The initial delay length equals the maximum.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_ms` or `sample_rate` would produce a
    /// zero-capacity buffer.
    pub fn new(max_delay_ms: f32, sample_rate: f32) -> Self {
        let capacity = ms_to_samples(max_delay_ms, sample_rate) as usize + 1;
        assert!(capacity > 1, "Delay capacity must be > 0");

        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            delay_ms: max_delay_ms,
            max_delay_ms,
            sample_rate,
            interpolation: Interpolation::Linear,
        }
    }

    /// Sets the interpolation method for fractional delay reads.
    pub fn set_interpolation(&mut self, interp: Interpolation) {
        self.interpolation = interp;
    }

    /// Sets the current delay length in milliseconds.
    ///
    /// Clamped to `[0, max_delay_ms]`.
    pub fn set_delay_ms(&mut self, ms: f32) {
        self.delay_ms = ms.clamp(0.0, self.max_delay_ms);
    }

    /// Current delay length in milliseconds.
    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    /// Current delay length in samples (possibly fractional).
    pub fn delay_samples(&self) -> f32 {
        ms_to_samples(self.delay_ms, self.sample_rate)
    }

    /// Reads a delayed sample with the configured interpolation method.
    ///
    /// In a read-before-write cycle, `read(d)` returns the sample written
    /// `d` steps before the one about to be written — a recirculating
    /// structure that reads then writes has a loop delay of exactly `d`.
    /// `delay_samples` may be fractional and is clamped to
    /// `[1, capacity − 1]`; one sample is the minimum resolvable delay.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let delay_clamped = delay_samples.clamp(1.0, (len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        // write_pos is the slot the current input will land in, so the
        // sample written delay_int steps ago sits delay_int slots behind it.
        let read_pos = (self.write_pos + len - delay_int) % len;

        match self.interpolation {
            Interpolation::None => self.buffer[read_pos],

            Interpolation::Linear => {
                let next_pos = (read_pos + len - 1) % len;
                let a = self.buffer[read_pos];
                let b = self.buffer[next_pos];
                a + (b - a) * frac
            }

            Interpolation::Cubic => {
                // 4-point cubic Lagrange interpolation
                let p0 = (read_pos + 1) % len;
                let p1 = read_pos;
                let p2 = (read_pos + len - 1) % len;
                let p3 = (read_pos + len - 2) % len;

                let y0 = self.buffer[p0];
                let y1 = self.buffer[p1];
                let y2 = self.buffer[p2];
                let y3 = self.buffer[p3];

                let t = frac;
                let t2 = t * t;
                let t3 = t2 * t;

                let a0 = y3 - y2 - y0 + y1;
                let a1 = y0 - y1 - a0;
                let a2 = y2 - y0;

                a0 * t3 + a1 * t2 + a2 * t + y1
            }
        }
    }

    /// Reads at the current nominal length.
    #[inline]
    pub fn read_nominal(&self) -> f32 {
        self.read(self.delay_samples())
    }

    /// Writes a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Combined read and write operation.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let output = self.read(delay_samples);
        self.write(sample);
        output
    }

    /// Clears the delay line (sets all samples to 0).
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Updates the sample rate, reallocating the buffer so the maximum
    /// delay time stays the same number of milliseconds.
    ///
    /// This is the one place the line allocates after construction; call
    /// it from configuration code, never from the audio thread.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let capacity = ms_to_samples(self.max_delay_ms, sample_rate) as usize + 1;
        self.buffer = vec![0.0; capacity.max(2)];
        self.write_pos = 0;
    }

    /// Maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Maximum delay in milliseconds.
    pub fn max_delay_ms(&self) -> f32 {
        self.max_delay_ms
    }
}
