//! Spectral frame in polar form

/// Number of frequency bins produced by a real transform of `window_size` samples
pub fn bin_count(window_size: usize) -> usize {
    window_size / 2 + 1
}

/// One analysis frame stored as magnitude and phase per frequency bin
///
/// Magnitudes are non-negative. Phases are in radians and are not wrapped to
/// `[-π, π]` by this type.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    norm: Vec<f32>,
    phase: Vec<f32>,
}

impl SpectralFrame {
    /// Create a zeroed frame for an analysis window of `window_size` samples
    ///
    /// The frame holds `window_size / 2 + 1` bins.
    pub fn new(window_size: usize) -> Self {
        Self::with_bins(bin_count(window_size))
    }

    /// Create a zeroed frame with exactly `bins` bins
    pub fn with_bins(bins: usize) -> Self {
        Self {
            norm: vec![0.0; bins],
            phase: vec![0.0; bins],
        }
    }

    /// Number of frequency bins
    pub fn len(&self) -> usize {
        self.norm.len()
    }

    /// True when the frame has no bins
    pub fn is_empty(&self) -> bool {
        self.norm.is_empty()
    }

    /// Magnitudes, indexed by bin
    pub fn norm(&self) -> &[f32] {
        &self.norm
    }

    /// Phases in radians, indexed by bin
    pub fn phase(&self) -> &[f32] {
        &self.phase
    }

    /// Mutable magnitudes
    pub fn norm_mut(&mut self) -> &mut [f32] {
        &mut self.norm
    }

    /// Mutable phases
    pub fn phase_mut(&mut self) -> &mut [f32] {
        &mut self.phase
    }

    /// Both halves at once, for writers that fill magnitude and phase together
    pub fn parts_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.norm, &mut self.phase)
    }

    /// Magnitude at `bin`, 0.0 when out of range
    pub fn get_norm(&self, bin: usize) -> f32 {
        self.norm.get(bin).copied().unwrap_or(0.0)
    }

    /// Phase at `bin`, 0.0 when out of range
    pub fn get_phase(&self, bin: usize) -> f32 {
        self.phase.get(bin).copied().unwrap_or(0.0)
    }

    /// Set the magnitude at `bin`; ignored when out of range
    pub fn set_norm(&mut self, bin: usize, value: f32) {
        if let Some(slot) = self.norm.get_mut(bin) {
            *slot = value;
        }
    }

    /// Set the phase at `bin`; ignored when out of range
    pub fn set_phase(&mut self, bin: usize, value: f32) {
        if let Some(slot) = self.phase.get_mut(bin) {
            *slot = value;
        }
    }

    /// Zero every magnitude and phase
    pub fn zeros(&mut self) {
        self.norm.fill(0.0);
        self.phase.fill(0.0);
    }

    /// Copy the bins both frames share from `source`
    pub fn copy_from(&mut self, source: &SpectralFrame) {
        let n = self.len().min(source.len());
        self.norm[..n].copy_from_slice(&source.norm[..n]);
        self.phase[..n].copy_from_slice(&source.phase[..n]);
    }

    /// Copy `source` onto this frame's bin grid by nearest-bin mapping
    ///
    /// Bin `i` of this frame takes the source bin at the same relative
    /// position along the frequency axis, so frames computed with different
    /// window sizes can be compared bin for bin.
    pub fn resample_from(&mut self, source: &SpectralFrame) {
        let dst_len = self.len();
        let src_len = source.len();
        if src_len == 0 {
            self.zeros();
            return;
        }
        if dst_len == src_len {
            self.copy_from(source);
            return;
        }

        let scale = if dst_len > 1 {
            (src_len - 1) as f32 / (dst_len - 1) as f32
        } else {
            0.0
        };
        for i in 0..dst_len {
            let j = ((i as f32 * scale).round() as usize).min(src_len - 1);
            self.norm[i] = source.norm[j];
            self.phase[i] = source.phase[j];
        }
    }
}
