//! Streaming onset detection
//!
//! One hop at a time:
//! phase vocoder → (whitening) → (log compression) → spectral descriptor →
//! peak picker → onset acceptance.
//!
//! Nine descriptors are available, selected by [`OnsetMethod`]:
//! - Energy, high-frequency content (HFC)
//! - Spectral difference, spectral flux
//! - Complex domain, phase deviation, weighted phase deviation
//! - Kullback-Liebler and modified Kullback-Liebler

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod descriptor;
pub mod detector;
pub mod peak_picker;

pub use descriptor::SpectralDescriptor;
pub use detector::OnsetDetector;
pub use peak_picker::PeakPicker;

/// Spectral descriptor used as the novelty function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnsetMethod {
    /// Spectral energy
    Energy,
    /// Spectral difference
    SpecDiff,
    /// High-frequency content
    #[default]
    Hfc,
    /// Complex-domain distance
    Complex,
    /// Phase deviation
    Phase,
    /// Weighted phase deviation
    WPhase,
    /// Kullback-Liebler divergence
    Kl,
    /// Modified Kullback-Liebler divergence
    Mkl,
    /// Spectral flux
    SpecFlux,
}

impl OnsetMethod {
    /// Every method, in declaration order
    pub const ALL: [OnsetMethod; 9] = [
        OnsetMethod::Energy,
        OnsetMethod::SpecDiff,
        OnsetMethod::Hfc,
        OnsetMethod::Complex,
        OnsetMethod::Phase,
        OnsetMethod::WPhase,
        OnsetMethod::Kl,
        OnsetMethod::Mkl,
        OnsetMethod::SpecFlux,
    ];

    /// Resolve a mode string, case-insensitively
    ///
    /// `"default"` and anything unrecognized map to [`OnsetMethod::Hfc`];
    /// `"complexdomain"` is an alias for [`OnsetMethod::Complex`].
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            log::debug!("Unknown onset mode {:?}, using hfc", name);
            Self::Hfc
        })
    }

    /// Strict variant of [`from_name`](Self::from_name): `None` for unknown names
    pub fn parse(name: &str) -> Option<Self> {
        let method = match name.to_ascii_lowercase().as_str() {
            "energy" => Self::Energy,
            "specdiff" => Self::SpecDiff,
            "hfc" | "default" => Self::Hfc,
            "complex" | "complexdomain" => Self::Complex,
            "phase" => Self::Phase,
            "wphase" => Self::WPhase,
            "kl" => Self::Kl,
            "mkl" => Self::Mkl,
            "specflux" => Self::SpecFlux,
            _ => return None,
        };
        Some(method)
    }

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::SpecDiff => "specdiff",
            Self::Hfc => "hfc",
            Self::Complex => "complex",
            Self::Phase => "phase",
            Self::WPhase => "wphase",
            Self::Kl => "kl",
            Self::Mkl => "mkl",
            Self::SpecFlux => "specflux",
        }
    }
}

impl fmt::Display for OnsetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OnsetMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}
