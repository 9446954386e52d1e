//! Factory preset table.
//!
//! Presets are plain parameter-value records. Applying one routes every
//! value through the engine's normalized [`ParameterInfo`] interface,
//! exactly like a live host edit; parameters an engine does not expose
//! (for example smearing on the FDN) are skipped by name lookup.

use stanza_core::ParameterInfo;

use crate::{MAX_DAMPING_HZ, MIN_HPF_HZ};

/// A complete parameter snapshot for either reverb engine.
///
/// Values are plain units: seconds, milliseconds, Hz, and 0–1 amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbPreset {
    /// Display name.
    pub name: &'static str,
    /// Wet amount, 0–1.
    pub wet: f32,
    /// Decay time in seconds.
    pub decay_secs: f32,
    /// Allpass smearing coefficient, 0–0.97.
    pub smearing: f32,
    /// Damping amount, 0–1.
    pub damping: f32,
    /// Output lowpass cutoff in Hz.
    pub lowpass_hz: f32,
    /// Output highpass cutoff in Hz.
    pub highpass_hz: f32,
    /// Pre-delay in milliseconds.
    pub predelay_ms: f32,
    /// Modulation rate in Hz.
    pub mod_rate_hz: f32,
    /// Modulation depth, 0–1.
    pub mod_depth: f32,
    /// Stereo spread, 0–1.
    pub spread: f32,
}

impl ReverbPreset {
    /// Apply this preset to an engine through its parameter interface.
    ///
    /// Each value is matched to a parameter by name, normalized with that
    /// parameter's descriptor and set through
    /// [`ParameterInfo::set_param_normalized`] — the same path a host
    /// edit takes, so clamping and mapping behave identically.
    pub fn apply<E: ParameterInfo>(&self, engine: &mut E) {
        let values = [
            ("Wet", self.wet),
            ("Decay", self.decay_secs),
            ("Smearing", self.smearing),
            ("Damping", self.damping),
            ("Lowpass", self.lowpass_hz),
            ("Highpass", self.highpass_hz),
            ("Pre-Delay", self.predelay_ms),
            ("Rate", self.mod_rate_hz),
            ("Mod Depth", self.mod_depth),
            ("Spread", self.spread),
        ];
        for (name, value) in values {
            if let Some(index) = engine.find_param_by_name(name)
                && let Some(desc) = engine.param_info(index)
            {
                engine.set_param_normalized(index, desc.normalize(desc.clamp(value)));
            }
        }
    }
}

/// The factory presets.
pub const PRESETS: [ReverbPreset; 5] = [
    ReverbPreset {
        name: "Default",
        wet: 0.2,
        decay_secs: 1.0,
        smearing: 0.7,
        damping: 0.5,
        lowpass_hz: MAX_DAMPING_HZ,
        highpass_hz: MIN_HPF_HZ,
        predelay_ms: 10.0,
        mod_rate_hz: 1.0,
        mod_depth: 0.3,
        spread: 0.3,
    },
    ReverbPreset {
        name: "Dreamy",
        wet: 0.5,
        decay_secs: 3.3,
        smearing: 0.8,
        damping: 0.6,
        lowpass_hz: 17000.0,
        highpass_hz: 200.0,
        predelay_ms: 80.0,
        mod_rate_hz: 1.0,
        mod_depth: 0.6,
        spread: 1.0,
    },
    ReverbPreset {
        name: "Short",
        wet: 0.2,
        decay_secs: 2.0,
        smearing: 0.5,
        damping: 0.4,
        lowpass_hz: MAX_DAMPING_HZ,
        highpass_hz: MIN_HPF_HZ,
        predelay_ms: 20.0,
        mod_rate_hz: 1.0,
        mod_depth: 0.1,
        spread: 0.2,
    },
    ReverbPreset {
        name: "Metallic",
        wet: 0.5,
        decay_secs: 2.2,
        smearing: 0.0,
        damping: 0.0,
        lowpass_hz: MAX_DAMPING_HZ,
        highpass_hz: 650.0,
        predelay_ms: 20.0,
        mod_rate_hz: 0.1,
        mod_depth: 0.0,
        spread: 1.0,
    },
    ReverbPreset {
        name: "Wobbly",
        wet: 0.65,
        decay_secs: 2.0,
        smearing: 0.7,
        damping: 0.3,
        lowpass_hz: 15000.0,
        highpass_hz: 500.0,
        predelay_ms: 20.0,
        mod_rate_hz: 3.0,
        mod_depth: 1.0,
        spread: 0.3,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdn::FdnReverb;
    use crate::schroeder::SchroederReverb;

    #[test]
    fn preset_names_are_unique() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn apply_to_schroeder_sets_every_field() {
        let mut reverb = SchroederReverb::new(48000.0);
        let preset = &PRESETS[1]; // Dreamy

        preset.apply(&mut reverb);

        assert!((reverb.wet() - preset.wet).abs() < 1e-4);
        assert!((reverb.decay_secs() - preset.decay_secs).abs() < 1e-4);
        assert!((reverb.smearing() - preset.smearing).abs() < 1e-4);
        assert!((reverb.damping() - preset.damping).abs() < 1e-4);
        assert!((reverb.predelay_ms() - preset.predelay_ms).abs() < 1e-2);
        assert!((reverb.mod_rate_hz() - preset.mod_rate_hz).abs() < 1e-3);
        assert!((reverb.mod_depth() - preset.mod_depth).abs() < 1e-4);
        assert!((reverb.spread() - preset.spread).abs() < 1e-4);
        // Log-mapped cutoffs round-trip within a fraction of a percent
        assert!((reverb.lowpass_hz() - preset.lowpass_hz).abs() / preset.lowpass_hz < 1e-3);
        assert!((reverb.highpass_hz() - preset.highpass_hz).abs() / preset.highpass_hz < 1e-3);
    }

    #[test]
    fn apply_to_fdn_skips_missing_params() {
        let mut fdn = FdnReverb::new(80.0, 300.0, 48000.0);
        let preset = &PRESETS[4]; // Wobbly

        preset.apply(&mut fdn);

        assert!((fdn.wet() - preset.wet).abs() < 1e-4);
        assert!((fdn.decay_secs() - preset.decay_secs).abs() < 1e-4);
        assert!((fdn.mod_rate_hz() - preset.mod_rate_hz).abs() < 1e-3);
        assert!((fdn.mod_depth() - preset.mod_depth).abs() < 1e-4);
        assert!((fdn.stereo_spread() - preset.spread).abs() < 1e-4);
        // Smearing and pre-delay have no FDN counterpart and are ignored
    }

    #[test]
    fn default_preset_matches_descriptor_defaults() {
        let reverb = SchroederReverb::new(48000.0);
        let preset = &PRESETS[0];

        assert!((reverb.wet() - preset.wet).abs() < 1e-6);
        assert!((reverb.decay_secs() - preset.decay_secs).abs() < 1e-6);
        assert!((reverb.predelay_ms() - preset.predelay_ms).abs() < 1e-6);
        assert!((reverb.spread() - preset.spread).abs() < 1e-6);
    }
}
