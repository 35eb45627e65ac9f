//! Signal-processing primitives used by the onset pipeline
//!
//! - Recursive filtering with a zero-phase (forward-backward) mode
//! - The real Fourier transform seam and the phase vocoder built on it
//! - Window statistics: median selection, peak tests, quadratic interpolation

pub mod fft;
pub mod filter;
pub mod phase_vocoder;
pub mod stats;

pub use fft::{RealTransform, RustFftTransform};
pub use filter::Filter;
pub use phase_vocoder::PhaseVocoder;
