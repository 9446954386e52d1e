//! Damping filters for reverb feedback paths.
//!
//! Every recirculating delay in a reverb loses a little high-frequency
//! energy per pass, the way air and soft surfaces absorb treble faster
//! than bass. [`DampingFilter`] models that loss with one of three
//! first-order topologies behind a single interface, selected with
//! [`DampingKind`].
//!
//! All three share the recursion `y[n] = x[n] + c * (y[n-1] - x[n])`; only
//! the coefficient derivation and output tap differ. Dispatch is a plain
//! `match` on the kind — no trait objects in the per-sample path.

use crate::flush_denormal;
use libm::{expf, tanf};

/// Fixed attenuation of the shelving variant above its corner (about −6 dB).
const SHELF_DEPTH: f32 = 0.5;

/// Coefficient derivation used by a [`DampingFilter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DampingKind {
    /// Exponential approximation: `c = exp(-2π f / sr)`. Cheapest; cutoff
    /// drifts slightly sharp near Nyquist.
    #[default]
    OnePole,
    /// Bilinear-matched pole: `c = (1 - tan(π f / sr)) / (1 + tan(π f / sr))`.
    /// Lands the −3 dB point exactly on the requested cutoff.
    Vicanek,
    /// High shelf: lowpass core with the treble reduced by a fixed depth
    /// instead of removed. Gentler damping for long, bright tails.
    Shelving,
}

/// First-order damping filter with a selectable topology.
///
/// # Example
///
/// ```rust
/// use stanza_core::{DampingFilter, DampingKind};
///
/// let mut damp = DampingFilter::new(48000.0, 6000.0, DampingKind::Vicanek);
/// let out = damp.process(1.0);
/// assert!(out < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DampingFilter {
    kind: DampingKind,
    state: f32,
    coeff: f32,
    cutoff: f32,
    sample_rate: f32,
}

impl DampingFilter {
    /// Create a damping filter at the given cutoff.
    pub fn new(sample_rate: f32, cutoff_hz: f32, kind: DampingKind) -> Self {
        let mut filter = Self {
            kind,
            state: 0.0,
            coeff: 0.0,
            cutoff: cutoff_hz,
            sample_rate,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Switch the topology; the cutoff and state are kept.
    pub fn set_kind(&mut self, kind: DampingKind) {
        self.kind = kind;
        self.recalculate_coeff();
    }

    /// Current topology.
    pub fn kind(&self) -> DampingKind {
        self.kind
    }

    /// Set the cutoff frequency in Hz, clamped to [10, sample_rate/2).
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff = cutoff_hz.clamp(10.0, self.sample_rate * 0.495);
        self.recalculate_coeff();
    }

    /// Current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        match self.kind {
            DampingKind::OnePole | DampingKind::Vicanek => self.state,
            // Shelf: keep (1 - depth) of the removed treble
            DampingKind::Shelving => input - SHELF_DEPTH * (input - self.state),
        }
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Update sample rate, rebuild the coefficient and reset state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.min(sample_rate * 0.495);
        self.state = 0.0;
        self.recalculate_coeff();
    }

    fn recalculate_coeff(&mut self) {
        self.coeff = match self.kind {
            DampingKind::OnePole | DampingKind::Shelving => {
                expf(-core::f32::consts::TAU * self.cutoff / self.sample_rate)
            }
            DampingKind::Vicanek => {
                let t = tanf(core::f32::consts::PI * self.cutoff / self.sample_rate);
                (1.0 - t) / (1.0 + t)
            }
        };
        // Coefficient must stay in [0, 1) for stability at any cutoff
        self.coeff = self.coeff.clamp(0.0, 0.9999);
    }
}
