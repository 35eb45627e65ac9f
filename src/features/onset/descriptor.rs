//! Spectral descriptor bank
//!
//! Each descriptor reduces one spectral frame to a single novelty value. The
//! variants that compare against earlier frames carry only the per-bin
//! history they need; that history is refreshed on every call, so the next
//! hop always compares against the frame just processed.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.
//!
//! Hainsworth, S., & Macleod, M. (2003). Onset detection in musical audio signals.
//! *Proceedings of the International Computer Music Conference*.

use super::OnsetMethod;
use crate::buffer::spectral_frame::bin_count;
use crate::buffer::SpectralFrame;

/// Magnitude below which a bin is ignored by the threshold-gated descriptors
const BIN_THRESHOLD: f32 = 0.1;

/// Offset keeping the Kullback-Liebler ratio finite on empty bins
const KL_EPSILON: f32 = 0.1;

/// A novelty function together with the history it needs
#[derive(Debug, Clone)]
pub enum SpectralDescriptor {
    /// Σ mag²
    Energy,
    /// Σ (k + 1)·mag
    Hfc,
    /// Half-wave rectified difference of squared magnitudes
    SpecDiff {
        /// Magnitudes of the previous frame
        old_mag: Vec<f32>,
    },
    /// Distance between the observed bin and its linear phase/magnitude prediction
    Complex {
        /// Magnitudes of the previous frame
        old_mag: Vec<f32>,
        /// Phases one frame back
        theta1: Vec<f32>,
        /// Phases two frames back
        theta2: Vec<f32>,
    },
    /// Σ |Δphase| over bins above the threshold
    Phase {
        /// Phases of the previous frame
        theta1: Vec<f32>,
    },
    /// Σ mag·|Δphase| over bins above the threshold
    WPhase {
        /// Phases of the previous frame
        theta1: Vec<f32>,
    },
    /// Kullback-Liebler divergence between consecutive magnitude spectra
    Kl {
        /// Magnitudes of the previous frame
        old_mag: Vec<f32>,
    },
    /// Modified (unweighted) Kullback-Liebler divergence
    Mkl {
        /// Magnitudes of the previous frame
        old_mag: Vec<f32>,
    },
    /// Half-wave rectified spectral flux
    SpecFlux {
        /// Magnitudes of the previous frame
        old_mag: Vec<f32>,
    },
}

impl SpectralDescriptor {
    /// Create a descriptor for frames of a `window_size`-sample analysis
    pub fn new(method: OnsetMethod, window_size: usize) -> Self {
        let bins = bin_count(window_size);
        let zeros = || vec![0.0; bins];
        match method {
            OnsetMethod::Energy => Self::Energy,
            OnsetMethod::Hfc => Self::Hfc,
            OnsetMethod::SpecDiff => Self::SpecDiff { old_mag: zeros() },
            OnsetMethod::Complex => Self::Complex {
                old_mag: zeros(),
                theta1: zeros(),
                theta2: zeros(),
            },
            OnsetMethod::Phase => Self::Phase { theta1: zeros() },
            OnsetMethod::WPhase => Self::WPhase { theta1: zeros() },
            OnsetMethod::Kl => Self::Kl { old_mag: zeros() },
            OnsetMethod::Mkl => Self::Mkl { old_mag: zeros() },
            OnsetMethod::SpecFlux => Self::SpecFlux { old_mag: zeros() },
        }
    }

    /// The method this descriptor implements
    pub fn method(&self) -> OnsetMethod {
        match self {
            Self::Energy => OnsetMethod::Energy,
            Self::Hfc => OnsetMethod::Hfc,
            Self::SpecDiff { .. } => OnsetMethod::SpecDiff,
            Self::Complex { .. } => OnsetMethod::Complex,
            Self::Phase { .. } => OnsetMethod::Phase,
            Self::WPhase { .. } => OnsetMethod::WPhase,
            Self::Kl { .. } => OnsetMethod::Kl,
            Self::Mkl { .. } => OnsetMethod::Mkl,
            Self::SpecFlux { .. } => OnsetMethod::SpecFlux,
        }
    }

    /// Compute the novelty value of `frame` and record it as history
    pub fn compute(&mut self, frame: &SpectralFrame) -> f32 {
        let norm = frame.norm();
        let phase = frame.phase();

        match self {
            Self::Energy => norm.iter().map(|&m| m * m).sum(),

            Self::Hfc => norm
                .iter()
                .enumerate()
                .map(|(k, &m)| (k + 1) as f32 * m)
                .sum(),

            Self::SpecDiff { old_mag } => {
                let mut onset = 0.0;
                for (&m, old) in norm.iter().zip(old_mag.iter_mut()) {
                    let val = m * m - *old * *old;
                    let dev = if val > 0.0 { val.sqrt() } else { 0.0 };
                    if m > BIN_THRESHOLD {
                        onset += dev.abs();
                    }
                    *old = m;
                }
                onset
            }

            Self::Complex {
                old_mag,
                theta1,
                theta2,
            } => {
                let mut onset = 0.0;
                for j in 0..norm.len().min(old_mag.len()) {
                    let predicted = 2.0 * theta1[j] - theta2[j];
                    let dev = predicted - phase[j];
                    let val = old_mag[j] * old_mag[j] + norm[j] * norm[j]
                        - 2.0 * old_mag[j] * norm[j] * dev.cos();
                    if val > 0.0 {
                        onset += val.sqrt();
                    }
                    // History moves on even when this bin contributed nothing
                    theta2[j] = theta1[j];
                    theta1[j] = phase[j];
                    old_mag[j] = norm[j];
                }
                onset
            }

            Self::Phase { theta1 } => {
                let mut onset = 0.0;
                for ((&m, &p), prev) in norm.iter().zip(phase).zip(theta1.iter_mut()) {
                    if m > BIN_THRESHOLD {
                        onset += (p - *prev).abs();
                    }
                    *prev = p;
                }
                onset
            }

            Self::WPhase { theta1 } => {
                let mut onset = 0.0;
                for ((&m, &p), prev) in norm.iter().zip(phase).zip(theta1.iter_mut()) {
                    if m > BIN_THRESHOLD {
                        onset += m * (p - *prev).abs();
                    }
                    *prev = p;
                }
                onset
            }

            Self::Kl { old_mag } => {
                let mut onset = 0.0;
                for (&m, old) in norm.iter().zip(old_mag.iter_mut()) {
                    onset += m * (m / (*old + KL_EPSILON)).ln_1p();
                    *old = m;
                }
                if onset.is_nan() {
                    0.0
                } else {
                    onset
                }
            }

            Self::Mkl { old_mag } => {
                let mut onset = 0.0;
                for (&m, old) in norm.iter().zip(old_mag.iter_mut()) {
                    onset += (m / (*old + KL_EPSILON)).ln_1p();
                    *old = m;
                }
                if onset.is_nan() {
                    0.0
                } else {
                    onset
                }
            }

            Self::SpecFlux { old_mag } => {
                let mut onset = 0.0;
                for (&m, old) in norm.iter().zip(old_mag.iter_mut()) {
                    if m > *old {
                        onset += m - *old;
                    }
                    *old = m;
                }
                onset
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(norm: &[f32], phase: &[f32]) -> SpectralFrame {
        let mut f = SpectralFrame::with_bins(norm.len());
        f.norm_mut().copy_from_slice(norm);
        f.phase_mut().copy_from_slice(phase);
        f
    }

    /// Descriptor for a 6-sample window (4 bins)
    fn descriptor(method: OnsetMethod) -> SpectralDescriptor {
        SpectralDescriptor::new(method, 6)
    }

    #[test]
    fn test_all_zero_spectrum_gives_zero() {
        let silent = SpectralFrame::with_bins(4);
        for method in OnsetMethod::ALL {
            let mut d = descriptor(method);
            assert_eq!(d.compute(&silent), 0.0, "{:?} first hop", method);
            assert_eq!(d.compute(&silent), 0.0, "{:?} second hop", method);
        }
    }

    #[test]
    fn test_method_round_trip() {
        for method in OnsetMethod::ALL {
            assert_eq!(descriptor(method).method(), method);
        }
    }

    #[test]
    fn test_energy_and_hfc() {
        let f = frame(&[1.0, 2.0, 0.0, 3.0], &[0.0; 4]);
        assert_eq!(descriptor(OnsetMethod::Energy).compute(&f), 14.0);
        // 1·1 + 2·2 + 3·0 + 4·3
        assert_eq!(descriptor(OnsetMethod::Hfc).compute(&f), 17.0);
    }

    #[test]
    fn test_specdiff_rectifies_and_gates() {
        let mut d = descriptor(OnsetMethod::SpecDiff);
        let first = frame(&[3.0, 0.05, 1.0, 0.0], &[0.0; 4]);
        // sqrt(9) + (0.05 below threshold) + sqrt(1)
        assert!((d.compute(&first) - 4.0).abs() < 1e-6);

        // Bin 0 grows 3 -> 5 (sqrt(16)), bin 2 decays (rectified away)
        let second = frame(&[5.0, 0.05, 0.5, 0.0], &[0.0; 4]);
        assert!((d.compute(&second) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_specflux() {
        let mut d = descriptor(OnsetMethod::SpecFlux);
        assert_eq!(d.compute(&frame(&[1.0, 2.0, 0.0, 0.0], &[0.0; 4])), 3.0);
        assert_eq!(d.compute(&frame(&[2.0, 1.0, 0.5, 0.0], &[0.0; 4])), 1.5);
        assert_eq!(d.compute(&frame(&[2.0, 1.0, 0.5, 0.0], &[0.0; 4])), 0.0);
    }

    #[test]
    fn test_phase_deviation() {
        let mut d = descriptor(OnsetMethod::Phase);
        let a = frame(&[1.0, 1.0, 0.01, 1.0], &[0.5, -0.5, 3.0, 0.0]);
        // Bin 2 is below the magnitude threshold
        assert!((d.compute(&a) - 1.0).abs() < 1e-6);

        let b = frame(&[1.0, 1.0, 1.0, 1.0], &[0.5, 0.5, 3.0, 0.0]);
        // |0.5 - 0.5| + |0.5 + 0.5| + |3 - 3| + 0
        assert!((d.compute(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_phase_deviation() {
        let mut d = descriptor(OnsetMethod::WPhase);
        d.compute(&frame(&[1.0; 4], &[0.0; 4]));
        let b = frame(&[2.0, 0.05, 1.0, 0.0], &[1.0, 1.0, -0.5, 2.0]);
        // 2·1 + (gated) + 1·0.5 + (gated)
        assert!((d.compute(&b) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_complex_domain_prediction() {
        let mut d = descriptor(OnsetMethod::Complex);
        // Steady bin rotating by 0.3 rad per hop
        let hops: Vec<SpectralFrame> = (0..4)
            .map(|n| frame(&[1.0, 0.0, 0.0, 0.0], &[0.3 * n as f32, 0.0, 0.0, 0.0]))
            .collect();
        let values: Vec<f32> = hops.iter().map(|f| d.compute(f)).collect();

        // Hop 0: nothing to compare with -> |mag| = 1
        assert!((values[0] - 1.0).abs() < 1e-5);
        // Once two hops of history exist the rotation is predicted exactly
        assert!(values[2].abs() < 1e-3, "got {}", values[2]);
        assert!(values[3].abs() < 1e-3, "got {}", values[3]);
    }

    #[test]
    fn test_complex_updates_history_when_bin_contributes_nothing() {
        let mut d = descriptor(OnsetMethod::Complex);
        let f = frame(&[0.0, 0.0, 0.0, 0.0], &[0.7, -0.2, 0.0, 1.0]);
        assert_eq!(d.compute(&f), 0.0);
        match &d {
            SpectralDescriptor::Complex { theta1, .. } => {
                assert_eq!(theta1.as_slice(), f.phase());
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_kl_and_mkl() {
        let f = frame(&[1.0, 0.0, 0.0, 0.0], &[0.0; 4]);

        let mut kl = descriptor(OnsetMethod::Kl);
        assert!((kl.compute(&f) - 11.0f32.ln()).abs() < 1e-5);
        // Same frame again: 1·ln(1 + 1/1.1)
        assert!((kl.compute(&f) - (1.0f32 + 1.0 / 1.1).ln()).abs() < 1e-5);

        let mut mkl = descriptor(OnsetMethod::Mkl);
        let g = frame(&[2.0, 0.0, 0.0, 0.0], &[0.0; 4]);
        assert!((mkl.compute(&g) - 21.0f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_kl_nan_is_clamped() {
        let nan = frame(&[f32::NAN, 1.0, 0.0, 0.0], &[0.0; 4]);
        assert_eq!(descriptor(OnsetMethod::Kl).compute(&nan), 0.0);
        assert_eq!(descriptor(OnsetMethod::Mkl).compute(&nan), 0.0);
    }
}
