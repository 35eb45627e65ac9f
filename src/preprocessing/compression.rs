//! Logarithmic magnitude compression
//!
//! `mag = ln(1 + λ·mag)` per bin. Compresses the dynamic range of the
//! spectrum so that descriptor values respond to relative rather than
//! absolute changes.

use crate::buffer::SpectralFrame;

/// Compress every magnitude of `frame` in place
///
/// Does nothing unless `lambda > 0`.
pub fn log_magnitude(frame: &mut SpectralFrame, lambda: f32) {
    if lambda <= 0.0 {
        return;
    }
    for m in frame.norm_mut() {
        *m = (lambda * *m).ln_1p();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_formula() {
        let mut frame = SpectralFrame::with_bins(3);
        frame.norm_mut().copy_from_slice(&[0.0, 1.0, 10.0]);
        log_magnitude(&mut frame, 2.0);
        assert_eq!(frame.get_norm(0), 0.0);
        assert!((frame.get_norm(1) - 3.0f32.ln()).abs() < 1e-6);
        assert!((frame.get_norm(2) - 21.0f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn test_non_positive_lambda_is_noop() {
        let mut frame = SpectralFrame::with_bins(2);
        frame.norm_mut().copy_from_slice(&[0.5, 4.0]);
        log_magnitude(&mut frame, 0.0);
        log_magnitude(&mut frame, -1.0);
        assert_eq!(frame.norm(), &[0.5, 4.0]);
    }

    #[test]
    fn test_phase_untouched() {
        let mut frame = SpectralFrame::with_bins(2);
        frame.set_norm(1, 2.0);
        frame.set_phase(1, 0.75);
        log_magnitude(&mut frame, 1.0);
        assert_eq!(frame.get_phase(1), 0.75);
    }
}
