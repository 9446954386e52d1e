//! Eight-line feedback delay network reverb.
//!
//! Generalizes the comb/allpass topology into N coupled delay lines mixed
//! through a Householder reflection, which is orthogonal and therefore
//! energy-preserving: with every per-line gain below unity the network's
//! spectral radius stays below 1 for all room sizes and decay times.
//!
//! Per-sample step: read all line outputs at their current (room-scaled,
//! modulated) lengths → per-line damping and decay gain → Householder
//! feedback mix → inject input → write → output taps per mix mode and
//! stereo-spread offset → output tone filters → equal-power stereo mix.

use libm::{floorf, sinf, sqrtf};
use stanza_core::{
    Butterworth, DampingFilter, DampingKind, DelayLine, Interpolation, Lfo, ParamDescriptor,
    ParamId, ParamScale, ParamUnit, ParameterInfo, SmoothedParam, StereoEffect, StereoMix,
    decay_to_feedback, flush_denormal, map_linear, mono_sum, ms_to_samples, unmap_linear,
};

use crate::{
    MAX_DAMPING_HZ, MAX_DECAY_SECS, MAX_HPF_HZ, MAX_MOD_RATE_HZ, MIN_DAMPING_HZ, MIN_HPF_HZ,
    MIN_MOD_RATE_HZ, STEREO_SPREAD_MS,
};

/// Number of delay lines in the network.
pub const NUM_LINES: usize = 8;

/// Deepest line-length modulation in milliseconds at depth 1.
pub const MAX_LINE_MOD_MS: f32 = 1.0;

/// Base line lengths in milliseconds at room size 1, before distribution
/// jitter. A roughly doubling progression: each length is close to twice
/// the one two steps earlier, keeping the modes non-harmonic while
/// covering early and late reflection ranges.
const LINE_BASE_MS: [f32; NUM_LINES] = [11.3, 23.5, 53.9, 78.3, 99.1, 133.4, 175.9, 238.9];

/// Injection / output-tap sign pattern, decorrelating adjacent lines.
const LINE_SIGNS: [f32; NUM_LINES] = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];

/// Spread of the randomized layout around each base length (±20%).
const RANDOM_RANGE: f32 = 0.2;

/// Parameter index: wet amount, 0–1.
pub const PARAM_WET: usize = 0;
/// Parameter index: decay time in seconds.
pub const PARAM_DECAY: usize = 1;
/// Parameter index: room size, 0–1.
pub const PARAM_ROOM_SIZE: usize = 2;
/// Parameter index: damping amount, 0–1.
pub const PARAM_DAMPING: usize = 3;
/// Parameter index: stereo spread, 0–1.
pub const PARAM_SPREAD: usize = 4;
/// Parameter index: output lowpass cutoff in Hz.
pub const PARAM_LPF: usize = 5;
/// Parameter index: output highpass cutoff in Hz.
pub const PARAM_HPF: usize = 6;
/// Parameter index: line modulation rate in Hz.
pub const PARAM_MOD_RATE: usize = 7;
/// Parameter index: line modulation depth, 0–1.
pub const PARAM_MOD_DEPTH: usize = 8;

/// How the base line lengths were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffusionLogic {
    /// Roughly doubling ratio progression across the line index.
    #[default]
    Doubled,
}

/// How base lengths are laid out across the line index.
///
/// A layout decision made at parameter-change time, never per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Use the ratio table as-is.
    #[default]
    Deterministic,
    /// Jitter each length within ±20% of its base, using a deterministic
    /// per-line hash so layouts are reproducible.
    RandomInRange,
}

/// How the N internal lines are summed to the 2 output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FdnMixMode {
    /// Sign-weighted sum over all lines, scaled for unit energy.
    #[default]
    All,
    /// Read two dedicated lines directly (line 0 left, line 1 right).
    First,
}

/// Deterministic per-line jitter in [-1, 1], sine-hash based.
fn line_jitter(index: usize) -> f32 {
    let x = sinf(index as f32 * 12.9898 + 78.233) * 43758.5453;
    (x - floorf(x)) * 2.0 - 1.0
}

fn layout_ms(base_ms: f32, index: usize, distribution: Distribution) -> f32 {
    match distribution {
        Distribution::Deterministic => base_ms,
        Distribution::RandomInRange => base_ms * (1.0 + RANDOM_RANGE * line_jitter(index)),
    }
}

fn unit_param(name: &'static str, short_name: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor {
        name,
        short_name,
        unit: ParamUnit::None,
        min: 0.0,
        max: 1.0,
        default,
        step: 0.01,
        id: ParamId(0),
        string_id: "",
        scale: ParamScale::Linear,
    }
}

/// Feedback delay network reverb with live room-size and spread morphing.
///
/// # Example
///
/// ```rust
/// use stanza_core::StereoEffect;
/// use stanza_reverb::{Distribution, DiffusionLogic, FdnReverb};
///
/// let mut fdn = FdnReverb::new(80.0, 300.0, 48000.0);
/// fdn.set_room_size(
///     0.7,
///     DiffusionLogic::Doubled,
///     Distribution::Deterministic,
///     Distribution::RandomInRange,
/// );
/// fdn.set_decay_secs(2.0);
///
/// let (l, r) = fdn.process(0.5, 0.5);
/// ```
pub struct FdnReverb {
    lines: [DelayLine; NUM_LINES],
    damping: [DampingFilter; NUM_LINES],
    /// Per-line decay gain from the −60 dB law.
    line_gain: [f32; NUM_LINES],
    /// Recirculation lengths in ms (room-scaled, laid out).
    feedback_ms: [f32; NUM_LINES],
    /// Output-tap lengths in ms (room-scaled, laid out).
    early_ms: [f32; NUM_LINES],

    lfo: Lfo,
    mod_depth: SmoothedParam,

    lowpass_l: Butterworth,
    lowpass_r: Butterworth,
    highpass_l: Butterworth,
    highpass_r: Butterworth,
    mix: StereoMix,
    mix_mode: FdnMixMode,

    // Canonical parameter values
    wet: f32,
    spread: f32,
    decay_secs: f32,
    damping_hz: f32,
    lpf_hz: f32,
    hpf_hz: f32,
    room_size: f32,
    diffusion: DiffusionLogic,
    early_distribution: Distribution,
    feedback_distribution: Distribution,

    max_early_ms: f32,
    max_feedback_ms: f32,
    sample_rate: f32,
}

impl FdnReverb {
    /// Create an FDN.
    ///
    /// `max_early_ms` bounds the output-tap lengths, `max_feedback_ms`
    /// the recirculation lengths; the line buffers are sized for the
    /// larger of the two plus modulation headroom.
    pub fn new(max_early_ms: f32, max_feedback_ms: f32, sample_rate: f32) -> Self {
        let capacity_ms = max_early_ms.max(max_feedback_ms) + MAX_LINE_MOD_MS;

        let lines = core::array::from_fn(|_| {
            let mut line = DelayLine::new(capacity_ms, sample_rate);
            // Linear only: the lines recirculate, and the interpolator's
            // gain must never exceed unity or the decay-law feedback no
            // longer bounds the loop at fractional lengths.
            line.set_interpolation(Interpolation::Linear);
            line
        });
        let damping =
            core::array::from_fn(|_| DampingFilter::new(sample_rate, MAX_DAMPING_HZ, DampingKind::OnePole));

        let wet = 0.5;
        let spread = 0.3;

        let mut fdn = Self {
            lines,
            damping,
            line_gain: [0.0; NUM_LINES],
            feedback_ms: [0.0; NUM_LINES],
            early_ms: [0.0; NUM_LINES],
            lfo: Lfo::new(sample_rate, 1.0),
            mod_depth: SmoothedParam::with_config(0.0, sample_rate, 20.0),
            lowpass_l: Butterworth::lowpass(sample_rate, MAX_DAMPING_HZ),
            lowpass_r: Butterworth::lowpass(sample_rate, MAX_DAMPING_HZ),
            highpass_l: Butterworth::highpass(sample_rate, MIN_HPF_HZ),
            highpass_r: Butterworth::highpass(sample_rate, MIN_HPF_HZ),
            mix: StereoMix::from_wet_spread(wet, spread),
            mix_mode: FdnMixMode::All,
            wet,
            spread,
            decay_secs: 2.0,
            damping_hz: MAX_DAMPING_HZ,
            lpf_hz: MAX_DAMPING_HZ,
            hpf_hz: MIN_HPF_HZ,
            room_size: 0.5,
            diffusion: DiffusionLogic::Doubled,
            early_distribution: Distribution::Deterministic,
            feedback_distribution: Distribution::Deterministic,
            max_early_ms,
            max_feedback_ms,
            sample_rate,
        };
        fdn.relayout();
        fdn
    }

    /// Rescale all line lengths proportionally to `size` and lay the base
    /// lengths out per the given distributions.
    ///
    /// `diffusion` names how the base lengths were derived; the two
    /// distributions independently shape the output-tap ("early") and
    /// recirculation ("feedback") layouts. Per-line decay gains are
    /// re-derived from the stored decay time since every feedback length
    /// may have changed.
    pub fn set_room_size(
        &mut self,
        size: f32,
        diffusion: DiffusionLogic,
        early_distribution: Distribution,
        feedback_distribution: Distribution,
    ) {
        self.room_size = size.clamp(0.0, 1.0);
        self.diffusion = diffusion;
        self.early_distribution = early_distribution;
        self.feedback_distribution = feedback_distribution;
        self.relayout();
    }

    /// Get the room size.
    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Set the decay time in seconds, clamped to 0–5 s.
    pub fn set_decay_secs(&mut self, decay_secs: f32) {
        self.decay_secs = decay_secs.clamp(0.0, MAX_DECAY_SECS);
        self.update_line_gains();
    }

    /// Get the decay time in seconds.
    pub fn decay_secs(&self) -> f32 {
        self.decay_secs
    }

    /// Set the per-line damping cutoff in Hz, clamped to the
    /// 500 Hz–20 kHz band.
    pub fn set_damping_frequency(&mut self, cutoff_hz: f32) {
        self.damping_hz = cutoff_hz.clamp(MIN_DAMPING_HZ, MAX_DAMPING_HZ);
        for filter in &mut self.damping {
            filter.set_cutoff(self.damping_hz);
        }
    }

    /// Get the per-line damping cutoff in Hz.
    pub fn damping_frequency(&self) -> f32 {
        self.damping_hz
    }

    /// Select the damping filter flavor used in every line.
    pub fn set_damping_kind(&mut self, kind: DampingKind) {
        for filter in &mut self.damping {
            filter.set_kind(kind);
        }
    }

    /// Set the output lowpass cutoff in Hz.
    pub fn set_lowpass_hz(&mut self, cutoff_hz: f32) {
        self.lpf_hz = cutoff_hz.clamp(MIN_DAMPING_HZ, MAX_DAMPING_HZ);
        self.lowpass_l.set_cutoff(self.lpf_hz);
        self.lowpass_r.set_cutoff(self.lpf_hz);
    }

    /// Get the output lowpass cutoff in Hz.
    pub fn lowpass_hz(&self) -> f32 {
        self.lpf_hz
    }

    /// Set the output highpass cutoff in Hz.
    pub fn set_highpass_hz(&mut self, cutoff_hz: f32) {
        self.hpf_hz = cutoff_hz.clamp(MIN_HPF_HZ, MAX_HPF_HZ);
        self.highpass_l.set_cutoff(self.hpf_hz);
        self.highpass_r.set_cutoff(self.hpf_hz);
    }

    /// Get the output highpass cutoff in Hz.
    pub fn highpass_hz(&self) -> f32 {
        self.hpf_hz
    }

    /// Set the line modulation depth, clamped to 0–1 (0–1 ms of length
    /// perturbation, sign-alternated per line).
    pub fn set_mod_depth(&mut self, depth: f32) {
        self.mod_depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Get the line modulation depth target.
    pub fn mod_depth(&self) -> f32 {
        self.mod_depth.target()
    }

    /// Set the line modulation rate in Hz, clamped to 0.1–10 Hz.
    ///
    /// Phase-continuous: changing the rate never resets the LFO.
    pub fn set_mod_rate_hz(&mut self, rate_hz: f32) {
        self.lfo
            .set_frequency(rate_hz.clamp(MIN_MOD_RATE_HZ, MAX_MOD_RATE_HZ));
    }

    /// Get the line modulation rate in Hz.
    pub fn mod_rate_hz(&self) -> f32 {
        self.lfo.frequency()
    }

    /// Set the stereo spread, clamped to 0–1.
    ///
    /// Offsets the right-channel read taps by `spread` times the stereo
    /// spread constant and widens the wet mix; at 0 both channels read
    /// identical taps and collapse to the same signal.
    pub fn set_stereo_spread(&mut self, spread: f32) {
        self.spread = spread.clamp(0.0, 1.0);
        self.mix = StereoMix::from_wet_spread(self.wet, self.spread);
    }

    /// Get the stereo spread.
    pub fn stereo_spread(&self) -> f32 {
        self.spread
    }

    /// Set the wet amount, clamped to 0–1.
    pub fn set_wet(&mut self, wet: f32) {
        self.wet = wet.clamp(0.0, 1.0);
        self.mix = StereoMix::from_wet_spread(self.wet, self.spread);
    }

    /// Get the wet amount.
    pub fn wet(&self) -> f32 {
        self.wet
    }

    /// Select how the lines are summed to the two output channels.
    pub fn set_mix_mode(&mut self, mode: FdnMixMode) {
        self.mix_mode = mode;
    }

    /// Get the mix mode.
    pub fn mix_mode(&self) -> FdnMixMode {
        self.mix_mode
    }

    /// Recompute the early and feedback length layouts from room size and
    /// the stored distributions, then re-derive the decay gains.
    fn relayout(&mut self) {
        // Small rooms keep a quarter of the base lengths
        let scale = 0.25 + 0.75 * self.room_size;
        for i in 0..NUM_LINES {
            let base = match self.diffusion {
                DiffusionLogic::Doubled => LINE_BASE_MS[i],
            };
            self.early_ms[i] =
                (layout_ms(base, i, self.early_distribution) * scale).min(self.max_early_ms);
            self.feedback_ms[i] =
                (layout_ms(base, i, self.feedback_distribution) * scale).min(self.max_feedback_ms);
            self.lines[i].set_delay_ms(self.feedback_ms[i]);
        }
        self.update_line_gains();
    }

    fn update_line_gains(&mut self) {
        for i in 0..NUM_LINES {
            let delay_samples = ms_to_samples(self.feedback_ms[i], self.sample_rate);
            self.line_gain[i] =
                decay_to_feedback(delay_samples, self.decay_secs, self.sample_rate);
        }
    }

    /// Read the two output taps for the current mix mode.
    fn read_output_taps(&self, spread_offset_samples: f32) -> (f32, f32) {
        match self.mix_mode {
            FdnMixMode::First => {
                let left = self
                    .lines[0].read(ms_to_samples(self.early_ms[0], self.sample_rate));
                let right = self.lines[1].read(
                    ms_to_samples(self.early_ms[1], self.sample_rate) + spread_offset_samples,
                );
                (left, right)
            }
            FdnMixMode::All => {
                let norm = 1.0 / sqrtf(NUM_LINES as f32);
                let mut left = 0.0;
                let mut right = 0.0;
                for i in 0..NUM_LINES {
                    let tap = ms_to_samples(self.early_ms[i], self.sample_rate);
                    left += LINE_SIGNS[i] * self.lines[i].read(tap);
                    right += LINE_SIGNS[i] * self.lines[i].read(tap + spread_offset_samples);
                }
                (left * norm, right * norm)
            }
        }
    }
}

impl StereoEffect for FdnReverb {
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mono = mono_sum(left, right);
        let lfo_value = self.lfo.next();
        let depth_ms = self.mod_depth.advance() * MAX_LINE_MOD_MS;

        // Read and damp all lines at their modulated lengths
        let mut damped = [0.0f32; NUM_LINES];
        let mut sum = 0.0;
        for i in 0..NUM_LINES {
            let nominal = ms_to_samples(self.feedback_ms[i], self.sample_rate);
            let offset = LINE_SIGNS[i] * ms_to_samples(depth_ms, self.sample_rate) * lfo_value;
            let line_out = self.lines[i].read((nominal + offset).max(0.0));
            damped[i] = self.damping[i].process(line_out) * self.line_gain[i];
            sum += damped[i];
        }

        // Householder reflection: x_i - (2/N)*sum, orthogonal for any N
        let reflect = sum * (2.0 / NUM_LINES as f32);
        for i in 0..NUM_LINES {
            let injection = damped[i] - reflect + LINE_SIGNS[i] * mono;
            self.lines[i].write(flush_denormal(injection));
        }

        let spread_offset =
            ms_to_samples(self.spread * STEREO_SPREAD_MS, self.sample_rate);
        let (mut wet_l, mut wet_r) = self.read_output_taps(spread_offset);

        wet_l = self.highpass_l.process(self.lowpass_l.process(wet_l));
        wet_r = self.highpass_r.process(self.lowpass_r.process(wet_r));

        self.mix.mix(wet_l, wet_r, left, right)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;

        for line in &mut self.lines {
            line.set_sample_rate(sample_rate);
        }
        for filter in &mut self.damping {
            filter.set_sample_rate(sample_rate);
        }
        self.lfo.set_sample_rate(sample_rate);
        self.mod_depth.set_sample_rate(sample_rate);
        self.lowpass_l.set_sample_rate(sample_rate);
        self.lowpass_r.set_sample_rate(sample_rate);
        self.highpass_l.set_sample_rate(sample_rate);
        self.highpass_r.set_sample_rate(sample_rate);

        self.update_line_gains();
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        for filter in &mut self.damping {
            filter.reset();
        }
        self.lfo.reset();
        self.mod_depth.snap_to_target();
        self.lowpass_l.reset();
        self.lowpass_r.reset();
        self.highpass_l.reset();
        self.highpass_r.reset();
    }
}

impl ParameterInfo for FdnReverb {
    fn param_count(&self) -> usize {
        9
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            PARAM_WET => Some(unit_param("Wet", "Wet", 0.5).with_id(ParamId(1), "fdn_wet")),
            PARAM_DECAY => Some(
                ParamDescriptor::time_secs("Decay", "Decay", 0.0, MAX_DECAY_SECS, 2.0)
                    .with_id(ParamId(2), "fdn_decay"),
            ),
            PARAM_ROOM_SIZE => {
                Some(unit_param("Room Size", "Room", 0.5).with_id(ParamId(3), "fdn_room"))
            }
            PARAM_DAMPING => {
                Some(unit_param("Damping", "Damp", 0.0).with_id(ParamId(4), "fdn_damping"))
            }
            PARAM_SPREAD => {
                Some(unit_param("Spread", "Spread", 0.3).with_id(ParamId(5), "fdn_spread"))
            }
            PARAM_LPF => Some(
                ParamDescriptor::freq_hz(
                    "Lowpass",
                    "LPF",
                    MIN_DAMPING_HZ,
                    MAX_DAMPING_HZ,
                    MAX_DAMPING_HZ,
                )
                .with_id(ParamId(6), "fdn_lpf"),
            ),
            PARAM_HPF => Some(
                ParamDescriptor::freq_hz("Highpass", "HPF", MIN_HPF_HZ, MAX_HPF_HZ, MIN_HPF_HZ)
                    .with_id(ParamId(7), "fdn_hpf"),
            ),
            PARAM_MOD_RATE => Some(
                ParamDescriptor::rate_hz(MIN_MOD_RATE_HZ, MAX_MOD_RATE_HZ, 1.0)
                    .with_id(ParamId(8), "fdn_mod_rate"),
            ),
            PARAM_MOD_DEPTH => {
                Some(unit_param("Mod Depth", "Depth", 0.0).with_id(ParamId(9), "fdn_mod_depth"))
            }
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_WET => self.wet,
            PARAM_DECAY => self.decay_secs,
            PARAM_ROOM_SIZE => self.room_size,
            PARAM_DAMPING => 1.0 - unmap_linear(self.damping_hz, MIN_DAMPING_HZ, MAX_DAMPING_HZ),
            PARAM_SPREAD => self.spread,
            PARAM_LPF => self.lpf_hz,
            PARAM_HPF => self.hpf_hz,
            PARAM_MOD_RATE => self.mod_rate_hz(),
            PARAM_MOD_DEPTH => self.mod_depth.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            PARAM_WET => self.set_wet(value),
            PARAM_DECAY => self.set_decay_secs(value),
            PARAM_ROOM_SIZE => self.set_room_size(
                value,
                self.diffusion,
                self.early_distribution,
                self.feedback_distribution,
            ),
            PARAM_DAMPING => self.set_damping_frequency(map_linear(
                1.0 - value.clamp(0.0, 1.0),
                MIN_DAMPING_HZ,
                MAX_DAMPING_HZ,
            )),
            PARAM_SPREAD => self.set_stereo_spread(value),
            PARAM_LPF => self.set_lowpass_hz(value),
            PARAM_HPF => self.set_highpass_hz(value),
            PARAM_MOD_RATE => self.set_mod_rate_hz(value),
            PARAM_MOD_DEPTH => self.set_mod_depth(value),
            _ => {}
        }
    }
}
