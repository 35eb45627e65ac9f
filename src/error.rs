//! Error types for the onset detection core

use thiserror::Error;

/// Errors that can occur while building or driving an onset detector
///
/// The per-hop pipeline itself is total: numeric edge cases are clamped
/// locally, so the only failures are malformed construction parameters and
/// buffers of the wrong size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Invalid input parameters or buffer sizes
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
