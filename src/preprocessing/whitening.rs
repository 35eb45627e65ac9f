//! Adaptive spectral whitening
//!
//! Each bin is divided by a slowly decaying peak tracker:
//!
//! ```text
//! peak[i] = max(decay·peak[i], floor)
//! peak[i] = max(mag[i], peak[i])
//! mag[i] /= peak[i]
//! ```
//!
//! `decay` is chosen so that a tracked peak falls by 60 dB over `relax_time`
//! seconds: `decay = 0.001 ^ ((hop_size / sample_rate) / relax_time)`.
//! Persistently loud bins are attenuated while bins that change keep their
//! weight.
//!
//! # Reference
//!
//! Stowell, D., & Plumbley, M. D. (2007). Adaptive whitening for improved
//! real-time audio onset detection. *Proceedings of the International
//! Computer Music Conference*.

use crate::buffer::spectral_frame::bin_count;
use crate::buffer::SpectralFrame;

/// Default relax time in seconds
pub const DEFAULT_RELAX_TIME: f32 = 250.0;

/// Default peak floor
pub const DEFAULT_FLOOR: f32 = 1.0e-4;

/// Attenuation reached after one relax time (-60 dB)
const RELAX_ATTENUATION: f64 = 0.001;

/// Per-bin adaptive gain normalization
#[derive(Debug, Clone)]
pub struct AdaptiveWhitening {
    hop_size: usize,
    sample_rate: u32,
    relax_time: f32,
    decay: f32,
    floor: f32,
    peaks: Vec<f32>,
}

impl AdaptiveWhitening {
    /// Create a whitening stage for frames of a `window_size`-sample analysis
    pub fn new(window_size: usize, hop_size: usize, sample_rate: u32) -> Self {
        let mut whitening = Self {
            hop_size,
            sample_rate,
            relax_time: DEFAULT_RELAX_TIME,
            decay: 0.0,
            floor: DEFAULT_FLOOR,
            peaks: vec![0.0; bin_count(window_size)],
        };
        whitening.decay = decay_for(hop_size, sample_rate, DEFAULT_RELAX_TIME);
        whitening.reset();
        whitening
    }

    /// Whiten `frame` in place and update the peak trackers
    pub fn apply(&mut self, frame: &mut SpectralFrame) {
        for (m, peak) in frame.norm_mut().iter_mut().zip(self.peaks.iter_mut()) {
            let decayed = (self.decay * *peak).max(self.floor);
            *peak = m.max(decayed);
            if *peak > 0.0 {
                *m /= *peak;
            }
        }
    }

    /// Set the relax time in seconds and recompute the decay factor
    ///
    /// Non-positive or non-finite values are ignored.
    pub fn set_relax_time(&mut self, relax_time: f32) {
        if !(relax_time.is_finite() && relax_time > 0.0) {
            log::warn!("Ignoring invalid whitening relax time {}", relax_time);
            return;
        }
        self.relax_time = relax_time;
        self.decay = decay_for(self.hop_size, self.sample_rate, relax_time);
    }

    /// Relax time in seconds
    pub fn relax_time(&self) -> f32 {
        self.relax_time
    }

    /// Per-hop decay factor applied to the tracked peaks
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Set the peak floor; the trackers pick it up at the next [`reset`](Self::reset)
    /// and through the per-hop `max(decay·peak, floor)` step
    pub fn set_floor(&mut self, floor: f32) {
        self.floor = floor;
    }

    /// Peak floor
    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Tracked peak per bin
    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Set every tracked peak back to the floor
    pub fn reset(&mut self) {
        self.peaks.fill(self.floor);
    }
}

/// `0.001 ^ ((hop_size / sample_rate) / relax_time)`
fn decay_for(hop_size: usize, sample_rate: u32, relax_time: f32) -> f32 {
    let hop_seconds = hop_size as f64 / sample_rate as f64;
    RELAX_ATTENUATION.powf(hop_seconds / relax_time as f64) as f32
}
