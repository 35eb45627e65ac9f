//! Real-input Fourier transform seam
//!
//! The phase vocoder only needs "N real samples in, N/2 + 1 complex bins out,
//! ordered by increasing frequency". [`RealTransform`] captures that contract
//! so the transform backend can be swapped; [`RustFftTransform`] is the
//! default backend built on `rustfft`.

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Forward transform of a fixed number of real samples
pub trait RealTransform: Send {
    /// Number of real input samples
    fn len(&self) -> usize;

    /// True for a zero-length transform
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transform `input` (exactly `len()` samples) into `output`
    /// (exactly `len() / 2 + 1` bins)
    fn forward(&mut self, input: &[f32], output: &mut [Complex<f32>]);
}

/// [`RealTransform`] backed by a planned complex `rustfft` transform
///
/// All working memory is allocated by [`RustFftTransform::new`]; `forward`
/// does not allocate.
pub struct RustFftTransform {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RustFftTransform {
    /// Plan a forward transform of `len` samples
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);
        let scratch_len = fft.get_inplace_scratch_len();
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); len],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }
}

impl fmt::Debug for RustFftTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RustFftTransform")
            .field("len", &self.buffer.len())
            .finish()
    }
}

impl RealTransform for RustFftTransform {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn forward(&mut self, input: &[f32], output: &mut [Complex<f32>]) {
        for (dst, &x) in self.buffer.iter_mut().zip(input) {
            *dst = Complex::new(x, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let bins = output.len().min(self.buffer.len() / 2 + 1);
        output[..bins].copy_from_slice(&self.buffer[..bins]);
    }
}
