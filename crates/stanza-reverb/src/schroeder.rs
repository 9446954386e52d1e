//! Freeverb-style Schroeder reverb.
//!
//! Pipeline: mono sum → pre-delay → 3 series input allpasses per channel →
//! 8 parallel damped combs per channel → 3 series output allpasses per
//! channel → output lowpass/highpass → tremolo → equal-power stereo mix.
//!
//! The comb and allpass delay tables are fixed tunings; the right channel
//! runs the same tables offset by [`STEREO_SPREAD_MS`] to decorrelate the
//! channels. Comb feedback signs alternate from unit 1 onward to spread
//! the resonant peaks.

use stanza_core::{
    AllpassFilter, Butterworth, CombFilter, DampingKind, MAX_SMEARING, ParamDescriptor, ParamId,
    ParamScale, ParamUnit, ParameterInfo, StereoEffect, StereoMix, map_linear, mono_sum,
    ms_to_samples,
};

use crate::tremolo::Tremolo;
use crate::{
    MAX_DAMPING_HZ, MAX_DECAY_SECS, MAX_HPF_HZ, MIN_DAMPING_HZ, MIN_HPF_HZ, STEREO_SPREAD_MS,
};

/// Number of parallel comb filters per channel.
pub const NUM_COMBS: usize = 8;

/// Number of series allpass diffusers on the input side, per channel.
pub const NUM_INPUT_ALLPASSES: usize = 3;

/// Number of series allpass diffusers on the output side, per channel.
pub const NUM_OUTPUT_ALLPASSES: usize = 3;

/// Longest supported pre-delay in milliseconds.
pub const MAX_PREDELAY_MS: f32 = 300.0;

/// Maximum comb delay-line length in milliseconds.
const MAX_COMB_MS: f32 = 100.0;

/// Maximum allpass delay-line length in milliseconds.
const MAX_ALLPASS_MS: f32 = 50.0;

/// Left-channel comb delay tunings in milliseconds. Chosen mutually
/// non-harmonic; the right channel adds the stereo-spread constant.
const COMB_DELAYS_MS: [f32; NUM_COMBS] = [25.31, 26.94, 28.96, 30.75, 32.24, 33.81, 35.31, 36.70];

/// Input diffuser delay tunings in milliseconds (left channel).
const INPUT_ALLPASS_MS: [f32; NUM_INPUT_ALLPASSES] = [1.1, 2.3, 4.7];

/// Output diffuser delay tunings in milliseconds (left channel).
const OUTPUT_ALLPASS_MS: [f32; NUM_OUTPUT_ALLPASSES] = [7.73, 10.00, 12.61];

/// Makeup gain applied after each comb, compensating the 8-way sum.
const COMB_MAKEUP_DB: f32 = -12.0;

/// Parameter index: wet amount, 0–1.
pub const PARAM_WET: usize = 0;
/// Parameter index: decay time in seconds.
pub const PARAM_DECAY: usize = 1;
/// Parameter index: pre-delay in milliseconds.
pub const PARAM_PREDELAY: usize = 2;
/// Parameter index: damping amount, 0–1.
pub const PARAM_DAMPING: usize = 3;
/// Parameter index: stereo spread, 0–1.
pub const PARAM_SPREAD: usize = 4;
/// Parameter index: allpass smearing coefficient.
pub const PARAM_SMEARING: usize = 5;
/// Parameter index: output lowpass cutoff in Hz.
pub const PARAM_LPF: usize = 6;
/// Parameter index: output highpass cutoff in Hz.
pub const PARAM_HPF: usize = 7;
/// Parameter index: tremolo rate in Hz.
pub const PARAM_MOD_RATE: usize = 8;
/// Parameter index: tremolo depth, 0–1.
pub const PARAM_MOD_DEPTH: usize = 9;

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

/// Freeverb-style stereo reverb.
///
/// All parameters are stored canonically in milliseconds / Hz / seconds so
/// a sample-rate change rebuilds every delay length and coefficient
/// deterministically.
///
/// # Example
///
/// ```rust
/// use stanza_core::StereoEffect;
/// use stanza_reverb::SchroederReverb;
///
/// let mut reverb = SchroederReverb::new(48000.0);
/// reverb.set_wet(1.0);
/// reverb.set_decay_secs(2.5);
/// reverb.set_predelay_ms(40.0);
///
/// let (l, r) = reverb.process(0.5, 0.5);
/// ```
pub struct SchroederReverb {
    predelay: CombFilter,
    input_allpasses_l: [AllpassFilter; NUM_INPUT_ALLPASSES],
    input_allpasses_r: [AllpassFilter; NUM_INPUT_ALLPASSES],
    combs_l: [CombFilter; NUM_COMBS],
    combs_r: [CombFilter; NUM_COMBS],
    output_allpasses_l: [AllpassFilter; NUM_OUTPUT_ALLPASSES],
    output_allpasses_r: [AllpassFilter; NUM_OUTPUT_ALLPASSES],
    lowpass_l: Butterworth,
    lowpass_r: Butterworth,
    highpass_l: Butterworth,
    highpass_r: Butterworth,
    tremolo: Tremolo,
    mix: StereoMix,

    // Canonical parameter values
    wet: f32,
    spread: f32,
    decay_secs: f32,
    damping: f32,
    smearing: f32,
    lpf_hz: f32,
    hpf_hz: f32,
    predelay_ms: f32,

    sample_rate: f32,
}

impl SchroederReverb {
    /// Create a reverb at the given sample rate, loaded with the default
    /// parameter set (1 s decay, 10 ms pre-delay, 20% wet).
    pub fn new(sample_rate: f32) -> Self {
        let decay_secs = 1.0;
        let damping = 0.5;
        let smearing = 0.7;

        let mut predelay = CombFilter::new(MAX_PREDELAY_MS, sample_rate);
        predelay.set_delay_ms(10.0);
        predelay.set_feedback(0.0);
        // Keep the pre-delay spectrally flat
        predelay.set_cutoff(MAX_DAMPING_HZ);

        let damping_hz = map_linear(1.0 - damping, MIN_DAMPING_HZ, MAX_DAMPING_HZ);

        let make_comb = |delay_ms: f32, negate: bool| {
            let mut comb = CombFilter::new(MAX_COMB_MS, sample_rate);
            comb.set_delay_ms(delay_ms);
            comb.set_cutoff(damping_hz);
            comb.set_makeup_db(COMB_MAKEUP_DB);
            comb.set_feedback_from_decay(decay_secs);
            if negate {
                comb.negate_feedback();
            }
            comb
        };

        let combs_l = core::array::from_fn(|i| make_comb(COMB_DELAYS_MS[i], i > 0));
        let combs_r =
            core::array::from_fn(|i| make_comb(COMB_DELAYS_MS[i] + STEREO_SPREAD_MS, i > 0));

        let make_allpass = |delay_ms: f32| {
            let mut ap = AllpassFilter::new(MAX_ALLPASS_MS, sample_rate);
            ap.set_delay_ms(delay_ms);
            ap.set_feedback(smearing);
            ap
        };

        let input_allpasses_l = core::array::from_fn(|i| make_allpass(INPUT_ALLPASS_MS[i]));
        let input_allpasses_r =
            core::array::from_fn(|i| make_allpass(INPUT_ALLPASS_MS[i] + STEREO_SPREAD_MS));
        let output_allpasses_l = core::array::from_fn(|i| make_allpass(OUTPUT_ALLPASS_MS[i]));
        let output_allpasses_r =
            core::array::from_fn(|i| make_allpass(OUTPUT_ALLPASS_MS[i] + STEREO_SPREAD_MS));

        let mut tremolo = Tremolo::new(sample_rate);
        tremolo.set_rate_hz(1.0);
        tremolo.set_depth(0.3);

        let wet = 0.2;
        let spread = 0.3;

        Self {
            predelay,
            input_allpasses_l,
            input_allpasses_r,
            combs_l,
            combs_r,
            output_allpasses_l,
            output_allpasses_r,
            lowpass_l: Butterworth::lowpass(sample_rate, MAX_DAMPING_HZ),
            lowpass_r: Butterworth::lowpass(sample_rate, MAX_DAMPING_HZ),
            highpass_l: Butterworth::highpass(sample_rate, MIN_HPF_HZ),
            highpass_r: Butterworth::highpass(sample_rate, MIN_HPF_HZ),
            tremolo,
            mix: StereoMix::from_wet_spread(wet, spread),
            wet,
            spread,
            decay_secs,
            damping,
            smearing,
            lpf_hz: MAX_DAMPING_HZ,
            hpf_hz: MIN_HPF_HZ,
            predelay_ms: 10.0,
            sample_rate,
        }
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

    /// Set the stereo spread, clamped to 0–1.
    ///
    /// 0.5 is width-neutral (both channels receive the averaged wet
    /// signal); 1.0 keeps the channels fully separate.
    pub fn set_spread(&mut self, spread: f32) {
        self.spread = spread.clamp(0.0, 1.0);
        self.mix = StereoMix::from_wet_spread(self.wet, self.spread);
    }

    /// Get the stereo spread.
    pub fn spread(&self) -> f32 {
        self.spread
    }

    /// Set the decay time in seconds, clamped to 0–5 s.
    ///
    /// Every comb re-derives its feedback gain from its own delay length
    /// via the −60 dB reverberation-time law.
    pub fn set_decay_secs(&mut self, decay_secs: f32) {
        self.decay_secs = decay_secs.clamp(0.0, MAX_DECAY_SECS);
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_feedback_from_decay(self.decay_secs);
        }
    }

    /// Get the decay time in seconds.
    pub fn decay_secs(&self) -> f32 {
        self.decay_secs
    }

    /// Set the damping amount, clamped to 0–1.
    ///
    /// `1 - damping` maps linearly onto the 500 Hz–20 kHz cutoff band of
    /// the in-comb damping filters: 0 is bright, 1 is dark.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
        let cutoff = map_linear(1.0 - self.damping, MIN_DAMPING_HZ, MAX_DAMPING_HZ);
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_cutoff(cutoff);
        }
    }

    /// Get the damping amount.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Select the damping filter flavor used inside every comb.
    pub fn set_damping_kind(&mut self, kind: DampingKind) {
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_damping_kind(kind);
        }
    }

    /// Set the allpass smearing coefficient, clamped to 0–0.97.
    pub fn set_smearing(&mut self, smearing: f32) {
        self.smearing = smearing.clamp(0.0, MAX_SMEARING);
        let all = self
            .input_allpasses_l
            .iter_mut()
            .chain(self.input_allpasses_r.iter_mut())
            .chain(self.output_allpasses_l.iter_mut())
            .chain(self.output_allpasses_r.iter_mut());
        for ap in all {
            ap.set_feedback(self.smearing);
        }
    }

    /// Get the smearing coefficient.
    pub fn smearing(&self) -> f32 {
        self.smearing
    }

    /// Set the output lowpass cutoff in Hz, clamped to the 500 Hz–20 kHz
    /// band.
    pub fn set_lowpass_hz(&mut self, cutoff_hz: f32) {
        self.lpf_hz = cutoff_hz.clamp(MIN_DAMPING_HZ, MAX_DAMPING_HZ);
        self.lowpass_l.set_cutoff(self.lpf_hz);
        self.lowpass_r.set_cutoff(self.lpf_hz);
    }

    /// Get the output lowpass cutoff in Hz.
    pub fn lowpass_hz(&self) -> f32 {
        self.lpf_hz
    }

    /// Set the output highpass cutoff in Hz, clamped to the 20 Hz–2 kHz
    /// band.
    pub fn set_highpass_hz(&mut self, cutoff_hz: f32) {
        self.hpf_hz = cutoff_hz.clamp(MIN_HPF_HZ, MAX_HPF_HZ);
        self.highpass_l.set_cutoff(self.hpf_hz);
        self.highpass_r.set_cutoff(self.hpf_hz);
    }

    /// Get the output highpass cutoff in Hz.
    pub fn highpass_hz(&self) -> f32 {
        self.hpf_hz
    }

    /// Set the pre-delay in milliseconds, clamped to 0–300 ms.
    pub fn set_predelay_ms(&mut self, ms: f32) {
        self.predelay_ms = ms.clamp(0.0, MAX_PREDELAY_MS);
        self.predelay.set_delay_ms(self.predelay_ms);
    }

    /// Get the pre-delay in milliseconds.
    pub fn predelay_ms(&self) -> f32 {
        self.predelay_ms
    }

    /// Set the tremolo rate in Hz, clamped to 0.1–10 Hz.
    pub fn set_mod_rate_hz(&mut self, rate_hz: f32) {
        self.tremolo.set_rate_hz(rate_hz);
    }

    /// Get the tremolo rate in Hz.
    pub fn mod_rate_hz(&self) -> f32 {
        self.tremolo.rate_hz()
    }

    /// Set the tremolo depth, clamped to 0–1.
    pub fn set_mod_depth(&mut self, depth: f32) {
        self.tremolo.set_depth(depth);
    }

    /// Get the tremolo depth.
    pub fn mod_depth(&self) -> f32 {
        self.tremolo.depth()
    }
}

impl StereoEffect for SchroederReverb {
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mono = mono_sum(left, right);

        // Pre-delay feeds both channels from the same mono tap
        let delayed = self.predelay.process(mono);
        let mut wet_l = delayed;
        let mut wet_r = delayed;

        for ap in &mut self.input_allpasses_l {
            wet_l = ap.process(wet_l);
        }
        for ap in &mut self.input_allpasses_r {
            wet_r = ap.process(wet_r);
        }

        let mut sum_l = 0.0;
        let mut sum_r = 0.0;
        for comb in &mut self.combs_l {
            sum_l += comb.process(wet_l);
        }
        for comb in &mut self.combs_r {
            sum_r += comb.process(wet_r);
        }

        for ap in &mut self.output_allpasses_l {
            sum_l = ap.process(sum_l);
        }
        for ap in &mut self.output_allpasses_r {
            sum_r = ap.process(sum_r);
        }

        sum_l = self.highpass_l.process(self.lowpass_l.process(sum_l));
        sum_r = self.highpass_r.process(self.lowpass_r.process(sum_r));

        let (sum_l, sum_r) = self.tremolo.process(sum_l, sum_r);

        self.mix.mix(sum_l, sum_r, left, right)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;

        self.predelay.set_sample_rate(sample_rate);
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_sample_rate(sample_rate);
        }
        let allpasses = self
            .input_allpasses_l
            .iter_mut()
            .chain(self.input_allpasses_r.iter_mut())
            .chain(self.output_allpasses_l.iter_mut())
            .chain(self.output_allpasses_r.iter_mut());
        for ap in allpasses {
            ap.set_sample_rate(sample_rate);
        }

        self.lowpass_l.set_sample_rate(sample_rate);
        self.lowpass_r.set_sample_rate(sample_rate);
        self.highpass_l.set_sample_rate(sample_rate);
        self.highpass_r.set_sample_rate(sample_rate);
        self.tremolo.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.predelay.clear();
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.clear();
        }
        let allpasses = self
            .input_allpasses_l
            .iter_mut()
            .chain(self.input_allpasses_r.iter_mut())
            .chain(self.output_allpasses_l.iter_mut())
            .chain(self.output_allpasses_r.iter_mut());
        for ap in allpasses {
            ap.clear();
        }
        self.lowpass_l.reset();
        self.lowpass_r.reset();
        self.highpass_l.reset();
        self.highpass_r.reset();
        self.tremolo.reset();
    }

    fn latency_samples(&self) -> u32 {
        ms_to_samples(self.predelay_ms, self.sample_rate) as u32
    }
}

impl ParameterInfo for SchroederReverb {
    fn param_count(&self) -> usize {
        10
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            PARAM_WET => Some(unit_param("Wet", "Wet", 0.2).with_id(ParamId(1), "rev_wet")),
            PARAM_DECAY => Some(
                ParamDescriptor::time_secs("Decay", "Decay", 0.0, MAX_DECAY_SECS, 1.0)
                    .with_id(ParamId(2), "rev_decay"),
            ),
            PARAM_PREDELAY => Some(
                ParamDescriptor::time_ms("Pre-Delay", "PreDly", 0.0, MAX_PREDELAY_MS, 10.0)
                    .with_id(ParamId(3), "rev_predelay"),
            ),
            PARAM_DAMPING => {
                Some(unit_param("Damping", "Damp", 0.5).with_id(ParamId(4), "rev_damping"))
            }
            PARAM_SPREAD => {
                Some(unit_param("Spread", "Spread", 0.3).with_id(ParamId(5), "rev_spread"))
            }
            PARAM_SMEARING => Some(ParamDescriptor {
                max: MAX_SMEARING,
                ..unit_param("Smearing", "Smear", 0.7)
            }
            .with_id(ParamId(6), "rev_smearing")),
            PARAM_LPF => Some(
                ParamDescriptor::freq_hz(
                    "Lowpass",
                    "LPF",
                    MIN_DAMPING_HZ,
                    MAX_DAMPING_HZ,
                    MAX_DAMPING_HZ,
                )
                .with_id(ParamId(7), "rev_lpf"),
            ),
            PARAM_HPF => Some(
                ParamDescriptor::freq_hz("Highpass", "HPF", MIN_HPF_HZ, MAX_HPF_HZ, MIN_HPF_HZ)
                    .with_id(ParamId(8), "rev_hpf"),
            ),
            PARAM_MOD_RATE => Some(
                ParamDescriptor::rate_hz(crate::MIN_MOD_RATE_HZ, crate::MAX_MOD_RATE_HZ, 1.0)
                    .with_id(ParamId(9), "rev_mod_rate"),
            ),
            PARAM_MOD_DEPTH => {
                Some(unit_param("Mod Depth", "Depth", 0.3).with_id(ParamId(10), "rev_mod_depth"))
            }
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_WET => self.wet,
            PARAM_DECAY => self.decay_secs,
            PARAM_PREDELAY => self.predelay_ms,
            PARAM_DAMPING => self.damping,
            PARAM_SPREAD => self.spread,
            PARAM_SMEARING => self.smearing,
            PARAM_LPF => self.lpf_hz,
            PARAM_HPF => self.hpf_hz,
            PARAM_MOD_RATE => self.tremolo.rate_hz(),
            PARAM_MOD_DEPTH => self.tremolo.depth(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            PARAM_WET => self.set_wet(value),
            PARAM_DECAY => self.set_decay_secs(value),
            PARAM_PREDELAY => self.set_predelay_ms(value),
            PARAM_DAMPING => self.set_damping(value),
            PARAM_SPREAD => self.set_spread(value),
            PARAM_SMEARING => self.set_smearing(value),
            PARAM_LPF => self.set_lowpass_hz(value),
            PARAM_HPF => self.set_highpass_hz(value),
            PARAM_MOD_RATE => self.set_mod_rate_hz(value),
            PARAM_MOD_DEPTH => self.set_mod_depth(value),
            _ => {}
        }
    }
}
