//! Configuration parameters for onset detection

use serde::{Deserialize, Serialize};

use crate::features::onset::OnsetMethod;
use crate::preprocessing::silence::DEFAULT_SILENCE_DB;

/// Per-mode default parameters
///
/// Resolved once from the mode string when a detector is built; the detector
/// then copies these into plain fields that can be overridden individually.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodPreset {
    /// Descriptor used as the novelty function
    pub method: OnsetMethod,
    /// Peak-picking threshold
    pub threshold: f32,
    /// Start delay in hops (converted to samples by truncation)
    pub delay_hops: f32,
    /// Minimum inter-onset interval in milliseconds
    pub minioi_ms: f32,
    /// Silence gate in dB
    pub silence_db: f32,
    /// Whether adaptive whitening is applied
    pub whitening: bool,
    /// Whitening relax time override in seconds
    pub whitening_relax_time: Option<f32>,
    /// Whitening floor override
    pub whitening_floor: Option<f32>,
    /// Log-compression λ (0 disables compression)
    pub compression: f32,
}

impl MethodPreset {
    /// Parameters shared by every mode before method-specific tuning
    const BASE: MethodPreset = MethodPreset {
        method: OnsetMethod::Hfc,
        threshold: 0.3,
        delay_hops: 4.3,
        minioi_ms: 50.0,
        silence_db: DEFAULT_SILENCE_DB,
        whitening: false,
        whitening_relax_time: None,
        whitening_floor: None,
        compression: 0.0,
    };

    /// Preset for a mode string, matched case-insensitively
    ///
    /// Besides the descriptor names this accepts `"old_default"`: HFC with
    /// the untuned base threshold and a 20 ms minimum interval. Unknown modes
    /// get the untuned base parameters with the HFC descriptor.
    pub fn for_mode(mode: &str) -> Self {
        if let Some(method) = OnsetMethod::parse(mode) {
            return Self::for_method(method);
        }
        if mode.eq_ignore_ascii_case("old_default") {
            return Self {
                minioi_ms: 20.0,
                ..Self::BASE
            };
        }
        log::debug!("Unknown onset mode {:?}, using untuned hfc", mode);
        Self::BASE
    }

    /// Tuned preset for a descriptor
    pub fn for_method(method: OnsetMethod) -> Self {
        let base = Self {
            method,
            ..Self::BASE
        };
        match method {
            OnsetMethod::Energy
            | OnsetMethod::SpecDiff
            | OnsetMethod::Phase
            | OnsetMethod::WPhase => base,
            OnsetMethod::Hfc => Self {
                threshold: 0.058,
                compression: 1.0,
                ..base
            },
            OnsetMethod::Complex => Self {
                delay_hops: 4.6,
                threshold: 0.15,
                whitening: true,
                compression: 1.0,
                ..base
            },
            OnsetMethod::Mkl => Self {
                threshold: 0.05,
                whitening: true,
                compression: 0.02,
                ..base
            },
            OnsetMethod::Kl => Self {
                threshold: 0.35,
                whitening: true,
                compression: 0.02,
                ..base
            },
            OnsetMethod::SpecFlux => Self {
                threshold: 0.18,
                whitening: true,
                whitening_relax_time: Some(100.0),
                whitening_floor: Some(1.0),
                compression: 10.0,
                ..base
            },
        }
    }
}

/// Onset detector configuration
///
/// The four construction parameters plus optional overrides applied on top
/// of the mode's [`MethodPreset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    /// Descriptor mode string (default: "hfc")
    pub method: String,

    /// Analysis window size in samples (default: 512)
    pub window_size: usize,

    /// Hop size in samples (default: 256)
    pub hop_size: usize,

    /// Sample rate in Hz (default: 44100)
    pub sample_rate: u32,

    /// Peak-picking threshold override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,

    /// Silence gate override in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence_db: Option<f32>,

    /// Minimum inter-onset interval override in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minioi_ms: Option<f32>,

    /// Start delay override in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<f32>,

    /// Adaptive whitening override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitening: Option<bool>,

    /// Log-compression λ override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<f32>,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            method: OnsetMethod::Hfc.name().to_string(),
            window_size: 512,
            hop_size: 256,
            sample_rate: 44100,
            threshold: None,
            silence_db: None,
            minioi_ms: None,
            delay_ms: None,
            whitening: None,
            compression: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_preset() {
        let energy = MethodPreset::for_mode("energy");
        assert_eq!(energy.method, OnsetMethod::Energy);
        assert_eq!(energy.threshold, 0.3);
        assert_eq!(energy.delay_hops, 4.3);
        assert_eq!(energy.minioi_ms, 50.0);
        assert_eq!(energy.silence_db, -70.0);
        assert!(!energy.whitening);
        assert_eq!(energy.compression, 0.0);
    }

    #[test]
    fn test_tuned_presets() {
        let hfc = MethodPreset::for_mode("HFC");
        assert_eq!((hfc.threshold, hfc.compression), (0.058, 1.0));

        let complex = MethodPreset::for_mode("complexdomain");
        assert_eq!(complex.method, OnsetMethod::Complex);
        assert_eq!(complex.delay_hops, 4.6);
        assert!(complex.whitening);

        let specflux = MethodPreset::for_mode("specflux");
        assert_eq!(specflux.whitening_relax_time, Some(100.0));
        assert_eq!(specflux.whitening_floor, Some(1.0));
        assert_eq!(specflux.compression, 10.0);

        let kl = MethodPreset::for_mode("kl");
        let mkl = MethodPreset::for_mode("mkl");
        assert_eq!((kl.threshold, kl.compression), (0.35, 0.02));
        assert_eq!((mkl.threshold, mkl.compression), (0.05, 0.02));
    }

    #[test]
    fn test_old_default_and_unknown() {
        let old = MethodPreset::for_mode("old_default");
        assert_eq!(old.method, OnsetMethod::Hfc);
        assert_eq!(old.threshold, 0.3);
        assert_eq!(old.minioi_ms, 20.0);
        assert_eq!(old.compression, 0.0);

        let unknown = MethodPreset::for_mode("bogus");
        assert_eq!(unknown.method, OnsetMethod::Hfc);
        assert_eq!(unknown.threshold, 0.3);
        assert_eq!(unknown.compression, 0.0);
        assert_ne!(unknown, MethodPreset::for_mode("default"));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: OnsetConfig =
            serde_json::from_str(r#"{ "method": "specflux", "hop_size": 128, "threshold": 0.4 }"#)
                .unwrap();
        assert_eq!(config.method, "specflux");
        assert_eq!(config.hop_size, 128);
        assert_eq!(config.window_size, 512);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.threshold, Some(0.4));
        assert_eq!(config.compression, None);
    }

    #[test]
    fn test_default_config_serializes_without_overrides() {
        let json = serde_json::to_string(&OnsetConfig::default()).unwrap();
        assert!(json.contains("\"method\":\"hfc\""));
        assert!(!json.contains("threshold"));
    }
}
