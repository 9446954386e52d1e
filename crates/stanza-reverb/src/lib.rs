//! Stereo reverberation engines built on `stanza-core`.
//!
//! Two topologies are provided:
//!
//! - [`SchroederReverb`] — a Freeverb-style pipeline: pre-delay, series
//!   input diffusion, a bank of eight parallel damped comb filters per
//!   channel, series output diffusion, output tone filters and a tremolo
//!   stage on the tail.
//! - [`FdnReverb`] — an eight-line feedback delay network coupled through
//!   a Householder reflection, with per-line damping, line-length
//!   modulation and live room-size / stereo-spread morphing.
//!
//! Both engines implement [`stanza_core::StereoEffect`] for processing and
//! [`stanza_core::ParameterInfo`] for host control, and share the
//! equal-power wet/spread mix law from [`stanza_core::StereoMix`].
//!
//! # Example
//!
//! ```rust
//! use stanza_core::StereoEffect;
//! use stanza_reverb::{SchroederReverb, PRESETS};
//!
//! let mut reverb = SchroederReverb::new(48000.0);
//! PRESETS[1].apply(&mut reverb); // "Dreamy"
//!
//! let (out_l, out_r) = reverb.process(0.5, 0.5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod fdn;
pub mod presets;
pub mod schroeder;
pub mod tremolo;

pub use fdn::{DiffusionLogic, Distribution, FdnMixMode, FdnReverb};
pub use presets::{PRESETS, ReverbPreset};
pub use schroeder::SchroederReverb;
pub use tremolo::Tremolo;

/// Longest supported decay time in seconds.
pub const MAX_DECAY_SECS: f32 = 5.0;

/// Slowest supported modulation rate in Hz.
pub const MIN_MOD_RATE_HZ: f32 = 0.1;

/// Fastest supported modulation rate in Hz.
pub const MAX_MOD_RATE_HZ: f32 = 10.0;

/// Lower edge of the damping / output-lowpass cutoff band in Hz.
pub const MIN_DAMPING_HZ: f32 = 500.0;

/// Upper edge of the damping / output-lowpass cutoff band in Hz.
pub const MAX_DAMPING_HZ: f32 = 20000.0;

/// Lower edge of the output-highpass cutoff band in Hz.
pub const MIN_HPF_HZ: f32 = 20.0;

/// Upper edge of the output-highpass cutoff band in Hz.
pub const MAX_HPF_HZ: f32 = 2000.0;

/// Fixed left/right delay offset in milliseconds used to decorrelate the
/// stereo channels.
pub const STEREO_SPREAD_MS: f32 = 1.0;
