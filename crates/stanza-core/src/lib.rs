//! Stanza Core - DSP primitives for real-time reverberation
//!
//! This crate provides the foundational building blocks for the stanza reverb
//! engines, designed for real-time audio processing with zero allocation in
//! the audio path.
//!
//! # Core Abstractions
//!
//! ## Filters
//!
//! - [`CombFilter`] - Damped feedback comb, the body of a Schroeder reverb tail
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//! - [`OnePole`] - One-pole lowpass/highpass for damping and tone
//! - [`DampingFilter`] - Switchable damping topologies for feedback paths
//! - [`Biquad`] / [`Butterworth`] - Second-order output tone filters
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Variable-length circular delay with interpolation
//!
//! ## Modulation & Parameters
//!
//! - [`Lfo`] - Low-frequency oscillator (4 waveforms, phase-continuous)
//! - [`SmoothedParam`] - Exponential smoothing for click-free automation
//! - [`ParameterInfo`] - Host parameter boundary with normalized values
//!
//! ## Mapping
//!
//! - [`mapping`] - Linear/logarithmic control maps, the reverberation decay
//!   law and the equal-power stereo mix law
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! stanza-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Clamp, don't fail**: Out-of-range control values are clamped to the
//!   supported range instead of returning errors

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod butterworth;
pub mod comb;
pub mod damping;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod mapping;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;

// Re-export main types at crate root
pub use allpass::{AllpassFilter, MAX_SMEARING};
pub use biquad::{Biquad, highpass_coefficients, lowpass_coefficients};
pub use butterworth::Butterworth;
pub use comb::CombFilter;
pub use damping::{DampingFilter, DampingKind};
pub use delay::{DelayLine, Interpolation};
pub use effect::StereoEffect;
pub use lfo::{Lfo, LfoWaveform};
pub use mapping::{
    StereoMix, decay_to_feedback, map_linear, map_log, unmap_linear, unmap_log,
};
pub use math::{
    db_to_linear, flush_denormal, linear_to_db, mono_sum, ms_to_samples, samples_to_ms,
};
pub use one_pole::{FilterMode, OnePole};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamId, ParamScale, ParamUnit, ParameterInfo};
