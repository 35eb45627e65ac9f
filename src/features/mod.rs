//! Feature extraction modules
//!
//! - Onset detection (spectral descriptors, peak picking, onset acceptance)

pub mod onset;
