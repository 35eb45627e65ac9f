//! # Stratum Onset
//!
//! Streaming onset detection for mono audio, one hop at a time.
//!
//! ## Features
//!
//! - **Spectral analysis**: Hann-windowed phase vocoder over a sliding window
//! - **Preprocessing**: Adaptive spectral whitening and log-magnitude compression
//! - **Descriptors**: Energy, HFC, complex domain, phase, weighted phase,
//!   spectral difference, Kullback-Liebler, modified Kullback-Liebler, spectral flux
//! - **Peak picking**: Zero-phase smoothing, median/mean adaptive threshold
//!   and quadratic interpolation
//! - **Onset acceptance**: Minimum inter-onset interval, start delay and silence gate
//!
//! ## Quick Start
//!
//! ```
//! use stratum_onset::OnsetDetector;
//!
//! let mut detector = OnsetDetector::new("hfc", 512, 256, 44100)?;
//!
//! let samples: Vec<f32> = vec![0.0; 44100]; // Your audio data
//! for hop in samples.chunks_exact(256) {
//!     if detector.process(hop)? > 0.0 {
//!         println!("Onset at {:.3} s", detector.last_onset_s());
//!     }
//! }
//! # Ok::<(), stratum_onset::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! hop → PhaseVocoder → (AdaptiveWhitening) → (log compression)
//!     → SpectralDescriptor → PeakPicker → OnsetDetector
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod dsp;
pub mod error;
pub mod features;
pub mod preprocessing;

// Re-export main types
pub use buffer::{SampleBuffer, SpectralFrame};
pub use config::{MethodPreset, OnsetConfig};
pub use error::AnalysisError;
pub use features::onset::{OnsetDetector, OnsetMethod, PeakPicker, SpectralDescriptor};
