//! Silence gating for onset candidates

use crate::buffer::sample_buffer::local_energy_db;

/// Default silence threshold in dB
pub const DEFAULT_SILENCE_DB: f32 = -70.0;

/// Silence gate configuration
///
/// A hop whose mean energy falls below `threshold_db` is treated as silent
/// and cannot produce an onset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceGate {
    /// Threshold in dB (default: -70.0)
    pub threshold_db: f32,
}

impl Default for SilenceGate {
    fn default() -> Self {
        Self {
            threshold_db: DEFAULT_SILENCE_DB,
        }
    }
}

impl SilenceGate {
    /// True when the local energy of `samples` is below the threshold
    pub fn is_silent(&self, samples: &[f32]) -> bool {
        is_silent(samples, self.threshold_db)
    }
}

/// True when `10·log10(Σx²/N) < threshold_db`
///
/// An all-zero buffer reports -90 dB and is silent for any threshold above
/// that.
pub fn is_silent(samples: &[f32], threshold_db: f32) -> bool {
    local_energy_db(samples) < threshold_db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_buffer_is_silent() {
        assert!(SilenceGate::default().is_silent(&[0.0; 256]));
    }

    #[test]
    fn test_threshold_edge() {
        // 0.01 amplitude DC: -40 dB
        let samples = [0.01f32; 64];
        assert!(!is_silent(&samples, -70.0));
        assert!(!is_silent(&samples, -40.5));
        assert!(is_silent(&samples, -39.5));
    }

    #[test]
    fn test_quiet_noise_floor() {
        // 1e-4 amplitude: -80 dB, below the default gate
        let samples = [1e-4f32; 128];
        assert!(SilenceGate::default().is_silent(&samples));
        assert!(!SilenceGate { threshold_db: -90.0 }.is_silent(&samples));
    }
}
