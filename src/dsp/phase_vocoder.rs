//! Phase vocoder analysis
//!
//! Windows one hop of input with a Hann window, runs the real transform and
//! stores the spectrum in polar form. Only the analysis direction is needed
//! for onset detection.

use std::fmt;

use rustfft::num_complex::Complex;

use super::fft::{RealTransform, RustFftTransform};
use crate::buffer::spectral_frame::bin_count;
use crate::buffer::SpectralFrame;
use crate::error::AnalysisError;

/// Hann window coefficients: `w[i] = 0.5 - 0.5·cos(2π·i / N)`
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = 2.0 * std::f64::consts::PI * i as f64 / size as f64;
            (0.5 - 0.5 * t.cos()) as f32
        })
        .collect()
}

/// Short-time spectral analyser
pub struct PhaseVocoder {
    window_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    windowed: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    transform: Box<dyn RealTransform>,
}

impl PhaseVocoder {
    /// Create a vocoder using the default `rustfft` backend
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if either size is zero.
    pub fn new(window_size: usize, hop_size: usize) -> Result<Self, AnalysisError> {
        Self::with_transform(
            window_size,
            hop_size,
            Box::new(RustFftTransform::new(window_size)),
        )
    }

    /// Create a vocoder on top of a caller-supplied transform
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if either size is zero or the
    /// transform length differs from `window_size`.
    pub fn with_transform(
        window_size: usize,
        hop_size: usize,
        transform: Box<dyn RealTransform>,
    ) -> Result<Self, AnalysisError> {
        if window_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Window size must be > 0".to_string(),
            ));
        }
        if hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if transform.len() != window_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Transform length {} does not match window size {}",
                transform.len(),
                window_size
            )));
        }

        Ok(Self {
            window_size,
            hop_size,
            window: hann_window(window_size),
            windowed: vec![0.0; window_size],
            spectrum: vec![Complex::new(0.0, 0.0); bin_count(window_size)],
            transform,
        })
    }

    /// Analysis window size in samples
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Hop size in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Window `input`, transform it and write magnitude/phase into `frame`
    ///
    /// Input shorter than the window is zero-padded; longer input is
    /// truncated to the window.
    pub fn analyze(&mut self, input: &[f32], frame: &mut SpectralFrame) {
        let n = input.len().min(self.window_size);
        for ((dst, &x), &w) in self.windowed.iter_mut().zip(&input[..n]).zip(&self.window) {
            *dst = x * w;
        }
        self.windowed[n..].fill(0.0);

        self.transform.forward(&self.windowed, &mut self.spectrum);

        let (norm, phase) = frame.parts_mut();
        for ((m, p), z) in norm.iter_mut().zip(phase.iter_mut()).zip(&self.spectrum) {
            *m = z.norm();
            *p = z.im.atan2(z.re);
        }
    }
}

impl fmt::Debug for PhaseVocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseVocoder")
            .field("window_size", &self.window_size)
            .field("hop_size", &self.hop_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window_shape() {
        let w = hann_window(8);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-6);
        assert!((w[2] - 0.5).abs() < 1e-6);
        assert!((w[1] - w[7]).abs() < 1e-6, "periodic Hann is symmetric about N/2");
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(PhaseVocoder::new(0, 256).is_err());
        assert!(PhaseVocoder::new(512, 0).is_err());
        assert!(PhaseVocoder::with_transform(512, 256, Box::new(RustFftTransform::new(256))).is_err());
    }

    #[test]
    fn test_silence_gives_empty_spectrum() {
        let mut pv = PhaseVocoder::new(512, 256).unwrap();
        let mut frame = SpectralFrame::new(512);
        pv.analyze(&[0.0; 256], &mut frame);
        assert!(frame.norm().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        // Full window of a tone centred on bin 16
        let size = 512;
        let mut pv = PhaseVocoder::new(size, size).unwrap();
        let mut frame = SpectralFrame::new(size);
        let input: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * 16.0 * i as f32 / size as f32).sin())
            .collect();
        pv.analyze(&input, &mut frame);

        let peak = frame
            .norm()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 16);
        // Hann coherent gain 0.5, sine amplitude N/2 -> N/4
        assert!((frame.get_norm(16) - size as f32 / 4.0).abs() < 0.5);
        assert!(frame.norm().iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn test_short_input_is_zero_padded() {
        let mut pv = PhaseVocoder::new(8, 4).unwrap();
        let mut padded = SpectralFrame::new(8);
        let mut explicit = SpectralFrame::new(8);
        pv.analyze(&[1.0, 1.0, 1.0, 1.0], &mut padded);
        pv.analyze(&[1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0], &mut explicit);
        assert_eq!(padded, explicit);
    }
}
