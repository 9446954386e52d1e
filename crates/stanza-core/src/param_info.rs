//! Parameter introspection for the host boundary.
//!
//! The host never sees Hz or seconds: it enumerates [`ParamDescriptor`]s
//! and exchanges values — plain or normalized — through the
//! [`ParameterInfo`] trait. Each descriptor carries the range, default and
//! normalization curve, so normalized set-then-get round-trips exactly.
//!
//! Display-string formatting, program switching and plugin identity are
//! host concerns and stay out of this crate.
//!
//! # Example
//!
//! ```rust
//! use stanza_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct OutputStage {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for OutputStage {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0)
//!                 .with_id(ParamId(100), "out_gain")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.gain_db = value.clamp(-60.0, 12.0);
//!         }
//!     }
//! }
//! ```
//!
//! # no_std Support
//!
//! This module is fully `no_std` compatible with no heap allocations.

/// Scaling curve for parameter normalization.
///
/// Determines how a parameter's plain value maps to normalized \[0.0, 1.0\]
/// space. Use Logarithmic for frequency parameters (20 Hz–20 kHz), where
/// equal knob travel should cover equal frequency ratios.
///
/// # Normalization Formulas
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)` — requires `min > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Linear mapping (default). Equal resolution across the range.
    #[default]
    Linear,
    /// Logarithmic mapping. More resolution at low values.
    Logarithmic,
}

/// Stable parameter identifier that survives reordering.
///
/// Used by hosts for automation recording and preset persistence. Once
/// assigned, a `ParamId` must never change for a given parameter — it is
/// part of the public API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Trait for engines that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the engine instance. The host typically works in normalized values via
/// [`get_param_normalized`](Self::get_param_normalized) /
/// [`set_param_normalized`](Self::set_param_normalized); the conversions go
/// through the descriptor's scale, so they invert exactly.
pub trait ParameterInfo {
    /// Returns the number of parameters this engine exposes.
    ///
    /// Valid parameter indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current plain value of the parameter at the given index.
    ///
    /// Returns `0.0` for out-of-bounds indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the plain value of the parameter at the given index.
    ///
    /// Implementations clamp to the descriptor's range; out-of-bounds
    /// indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Gets the current value in normalized [0, 1] space.
    fn get_param_normalized(&self, index: usize) -> f32 {
        match self.param_info(index) {
            Some(desc) => desc.normalize(self.get_param(index)),
            None => 0.0,
        }
    }

    /// Sets the value from normalized [0, 1] space.
    fn set_param_normalized(&mut self, index: usize, normalized: f32) {
        if let Some(desc) = self.param_info(index) {
            #[cfg(feature = "tracing")]
            tracing::trace!("set_param: {} = {normalized}", desc.name);
            self.set_param(index, desc.denormalize(normalized.clamp(0.0, 1.0)));
        }
    }

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against both [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i)
                && (desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name))
            {
                return Some(i);
            }
        }
        None
    }

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// Scans all parameters (O(n)) — suitable for setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// Provides everything a host needs to show the parameter, validate
/// values, and convert between normalized (0.0–1.0) and plain values.
///
/// The `short_name` field should be 8 characters or less for hardware
/// displays. The `step` field is the recommended increment for
/// encoder-based control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Decay Time").
    pub name: &'static str,

    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value for this parameter.
    pub min: f32,

    /// Maximum allowed value for this parameter.
    pub max: f32,

    /// Default value when the engine is initialized or reset.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Stable numeric ID for host automation and preset persistence.
    ///
    /// Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID for presets and debugging.
    ///
    /// Convention: `"engine_param"` (e.g., `"rev_decay"`). Default: `""`.
    pub string_id: &'static str,

    /// Normalization curve for mapping between plain and normalized values.
    pub scale: ParamScale,
}

impl ParamDescriptor {
    /// Standard mix parameter (0–100%, default 50%).
    pub fn mix() -> Self {
        Self {
            name: "Mix",
            short_name: "Mix",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Standard depth parameter (0–100%, default 50%).
    pub fn depth() -> Self {
        Self {
            name: "Depth",
            short_name: "Depth",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Time parameter with custom name and range (milliseconds).
    pub fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Time parameter in seconds (decay times).
    pub fn time_secs(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Seconds,
            min,
            max,
            default,
            step: 0.1,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Gain parameter with custom name and range (decibels).
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Frequency parameter in Hz with logarithmic scaling.
    ///
    /// Log scaling gives perceptually uniform control over cutoffs.
    pub fn freq_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Logarithmic,
        }
    }

    /// Standard LFO rate parameter in Hz (linear scale).
    pub fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Rate",
            short_name: "Rate",
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 0.05,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// Builder pattern — call after a factory method or struct literal.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    ///
    /// - **Linear**: `(value - min) / (max - min)`
    /// - **Logarithmic**: `ln(value/min) / ln(max/min)` — requires `min > 0`
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Converts a normalized value (0.0 to 1.0) to the plain parameter range.
    ///
    /// Exact inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }
}

/// Unit type for parameter display and formatting.
///
/// Helps host applications format parameter values with appropriate units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - for gain and level parameters.
    Decibels,

    /// Hertz (Hz) - for cutoff and rate parameters.
    Hertz,

    /// Milliseconds (ms) - for delay and pre-delay times.
    Milliseconds,

    /// Seconds (s) - for decay times.
    Seconds,

    /// Percentage (%) - for mix, spread, and normalized parameters.
    Percent,

    /// No unit - for dimensionless parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Seconds => " s",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal engine for trait testing
    struct TestEngine {
        decay: f32,
        cutoff: f32,
    }

    impl TestEngine {
        fn new() -> Self {
            Self {
                decay: 1.0,
                cutoff: 8000.0,
            }
        }
    }

    impl ParameterInfo for TestEngine {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(
                    ParamDescriptor::time_secs("Decay", "Decay", 0.0, 5.0, 1.0)
                        .with_id(ParamId(100), "test_decay"),
                ),
                1 => Some(
                    ParamDescriptor::freq_hz("Lowpass", "LPF", 20.0, 20000.0, 8000.0)
                        .with_id(ParamId(101), "test_lpf"),
                ),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.decay,
                1 => self.cutoff,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            match index {
                0 => {
                    if let Some(desc) = self.param_info(0) {
                        self.decay = desc.clamp(value);
                    }
                }
                1 => {
                    if let Some(desc) = self.param_info(1) {
                        self.cutoff = desc.clamp(value);
                    }
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_param_count_and_info() {
        let engine = TestEngine::new();
        assert_eq!(engine.param_count(), 2);

        let decay = engine.param_info(0).unwrap();
        assert_eq!(decay.name, "Decay");
        assert_eq!(decay.unit, ParamUnit::Seconds);

        let lpf = engine.param_info(1).unwrap();
        assert_eq!(lpf.scale, ParamScale::Logarithmic);

        assert!(engine.param_info(2).is_none());
    }

    #[test]
    fn test_get_set_param() {
        let mut engine = TestEngine::new();

        engine.set_param(0, 3.5);
        assert_eq!(engine.get_param(0), 3.5);

        // Clamped to range
        engine.set_param(0, 100.0);
        assert_eq!(engine.get_param(0), 5.0);
        engine.set_param(0, -1.0);
        assert_eq!(engine.get_param(0), 0.0);
    }

    #[test]
    fn test_normalized_roundtrip_linear() {
        let mut engine = TestEngine::new();

        engine.set_param_normalized(0, 0.5);
        assert!((engine.get_param(0) - 2.5).abs() < 1e-5);
        assert!((engine.get_param_normalized(0) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_normalized_roundtrip_log() {
        let mut engine = TestEngine::new();

        // Log midpoint of [20, 20000] is the geometric mean ~632.5 Hz
        engine.set_param_normalized(1, 0.5);
        let geo = libm::sqrtf(20.0 * 20000.0);
        assert!((engine.get_param(1) - geo).abs() < 1.0);

        for norm in [0.0, 0.1, 0.37, 0.8, 1.0] {
            engine.set_param_normalized(1, norm);
            assert!(
                (engine.get_param_normalized(1) - norm).abs() < 1e-4,
                "normalized round-trip failed for {norm}"
            );
        }
    }

    #[test]
    fn test_normalized_out_of_range_clamps() {
        let mut engine = TestEngine::new();
        engine.set_param_normalized(0, 2.0);
        assert_eq!(engine.get_param(0), 5.0);
        engine.set_param_normalized(0, -1.0);
        assert_eq!(engine.get_param(0), 0.0);
    }

    #[test]
    fn test_out_of_bounds_index() {
        let mut engine = TestEngine::new();

        assert_eq!(engine.get_param(99), 0.0);
        assert_eq!(engine.get_param_normalized(99), 0.0);

        engine.set_param(99, 42.0);
        engine.set_param_normalized(99, 0.7);
        assert_eq!(engine.get_param(0), 1.0);
    }

    #[test]
    fn test_descriptor_normalize_denormalize() {
        let desc = ParamDescriptor::mix(); // 0..100, linear

        assert_eq!(desc.normalize(0.0), 0.0);
        assert_eq!(desc.normalize(50.0), 0.5);
        assert_eq!(desc.denormalize(1.0), 100.0);

        let original = 73.0;
        let rt = desc.denormalize(desc.normalize(original));
        assert!((rt - original).abs() < 0.001);
    }

    #[test]
    fn test_log_descriptor_roundtrip() {
        let desc = ParamDescriptor::freq_hz("Cutoff", "Cut", 20.0, 20000.0, 1000.0);

        for &val in &[20.0, 100.0, 1000.0, 5000.0, 20000.0] {
            let rt = desc.denormalize(desc.normalize(val));
            assert!(
                (rt - val).abs() / val < 1e-4,
                "log round-trip failed for {val}: got {rt}"
            );
        }
    }

    #[test]
    fn test_normalize_zero_range() {
        let desc = ParamDescriptor::gain_db("Fixed", "Fixed", 42.0, 42.0, 42.0);
        assert_eq!(desc.normalize(42.0), 0.0);
    }

    #[test]
    fn test_find_by_name_and_id() {
        let engine = TestEngine::new();

        assert_eq!(engine.find_param_by_name("decay"), Some(0));
        assert_eq!(engine.find_param_by_name("LPF"), Some(1));
        assert_eq!(engine.find_param_by_name("missing"), None);

        assert_eq!(engine.param_id(0), Some(ParamId(100)));
        assert_eq!(engine.param_index_by_id(ParamId(101)), Some(1));
        assert_eq!(engine.param_index_by_id(ParamId(999)), None);
    }

    #[test]
    fn test_param_unit_suffix() {
        assert_eq!(ParamUnit::Decibels.suffix(), " dB");
        assert_eq!(ParamUnit::Seconds.suffix(), " s");
        assert_eq!(ParamUnit::Percent.suffix(), "%");
        assert_eq!(ParamUnit::None.suffix(), "");
    }
}
