//! Spectrum and hop preprocessing
//!
//! This module contains the optional stages run between spectral analysis and
//! the descriptor bank, plus the hop-level silence gate:
//! - Adaptive spectral whitening
//! - Logarithmic magnitude compression
//! - Silence detection

pub mod compression;
pub mod silence;
pub mod whitening;

pub use silence::SilenceGate;
pub use whitening::AdaptiveWhitening;
