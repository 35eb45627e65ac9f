//! Fixed-length real-valued sample vector

/// Level reported for a buffer holding no energy at all
pub const SILENT_LEVEL_DB: f32 = -90.0;

/// Fixed-length buffer of real samples
///
/// The length is set at creation and never changes; every statistic runs over
/// the full length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    data: Vec<f32>,
}

impl SampleBuffer {
    /// Create a zero-filled buffer of `len` samples
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// Create a buffer holding a copy of `samples`
    pub fn from_slice(samples: &[f32]) -> Self {
        Self {
            data: samples.to_vec(),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the samples
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutably borrow the samples
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sample at `position`, or 0.0 when out of range
    pub fn get(&self, position: usize) -> f32 {
        self.data.get(position).copied().unwrap_or(0.0)
    }

    /// Overwrite the sample at `position`; out-of-range writes are ignored
    pub fn set(&mut self, position: usize, value: f32) {
        if let Some(slot) = self.data.get_mut(position) {
            *slot = value;
        }
    }

    /// Set every sample to zero
    pub fn zeros(&mut self) {
        self.data.fill(0.0);
    }

    /// Copy as many samples as both buffers can hold from `source`
    pub fn copy_from(&mut self, source: &[f32]) {
        let n = self.data.len().min(source.len());
        self.data[..n].copy_from_slice(&source[..n]);
    }

    /// Copy `source` scaled by `weight`, over the common length
    pub fn weighted_copy_from(&mut self, source: &[f32], weight: f32) {
        for (dst, &src) in self.data.iter_mut().zip(source) {
            *dst = src * weight;
        }
    }

    /// Multiply every sample by `weight`
    pub fn weight(&mut self, weight: f32) {
        for x in &mut self.data {
            *x *= weight;
        }
    }

    /// Shift every sample one slot towards the front and append `value`
    ///
    /// The oldest sample (index 0) is discarded. No-op on an empty buffer.
    pub fn push(&mut self, value: f32) {
        if let Some(last) = self.data.len().checked_sub(1) {
            self.data.copy_within(1.., 0);
            self.data[last] = value;
        }
    }

    /// Arithmetic mean, 0.0 for an empty buffer
    pub fn mean(&self) -> f32 {
        mean(&self.data)
    }

    /// Largest sample, 0.0 for an empty buffer
    pub fn max(&self) -> f32 {
        self.data.iter().copied().reduce(f32::max).unwrap_or(0.0)
    }

    /// Smallest sample, 0.0 for an empty buffer
    pub fn min(&self) -> f32 {
        self.data.iter().copied().reduce(f32::min).unwrap_or(0.0)
    }

    /// Mean energy in decibels, see [`local_energy_db`]
    pub fn local_energy_db(&self) -> f32 {
        local_energy_db(&self.data)
    }
}

impl From<Vec<f32>> for SampleBuffer {
    fn from(data: Vec<f32>) -> Self {
        Self { data }
    }
}

/// Arithmetic mean of `samples`, 0.0 when empty
pub fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Mean energy of `samples` in dB: `10·log10(Σx² / N)`
///
/// Returns [`SILENT_LEVEL_DB`] when the buffer carries no energy.
pub fn local_energy_db(samples: &[f32]) -> f32 {
    let energy: f32 = samples.iter().map(|&x| x * x).sum();
    if energy > 0.0 {
        10.0 * (energy / samples.len() as f32).log10()
    } else {
        SILENT_LEVEL_DB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics() {
        let buf = SampleBuffer::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.mean(), 3.0);
        assert_eq!(buf.max(), 5.0);
        assert_eq!(buf.min(), 1.0);
    }

    #[test]
    fn test_empty_statistics() {
        let buf = SampleBuffer::new(0);
        assert!(buf.is_empty());
        assert_eq!(buf.mean(), 0.0);
        assert_eq!(buf.max(), 0.0);
        assert_eq!(buf.min(), 0.0);
    }

    #[test]
    fn test_push_shifts_left() {
        let mut buf = SampleBuffer::from_slice(&[1.0, 2.0, 3.0]);
        buf.push(4.0);
        assert_eq!(buf.as_slice(), &[2.0, 3.0, 4.0]);
        assert_eq!(buf.len(), 3, "push must not change the length");
    }

    #[test]
    fn test_bounds_checked_access() {
        let mut buf = SampleBuffer::new(2);
        buf.set(1, 0.5);
        buf.set(7, 1.0);
        assert_eq!(buf.get(1), 0.5);
        assert_eq!(buf.get(7), 0.0);
    }

    #[test]
    fn test_copy_uses_common_length() {
        let mut buf = SampleBuffer::new(3);
        buf.copy_from(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0]);

        buf.weighted_copy_from(&[1.0, 1.0], 0.5);
        assert_eq!(buf.as_slice(), &[0.5, 0.5, 3.0]);

        buf.weight(2.0);
        assert_eq!(buf.as_slice(), &[1.0, 1.0, 6.0]);
    }

    #[test]
    fn test_local_energy_db() {
        // Full-scale square wave: mean energy 1.0 -> 0 dB
        let buf = SampleBuffer::from_slice(&[1.0, -1.0, 1.0, -1.0]);
        assert!(buf.local_energy_db().abs() < 1e-6);

        // 0.1 amplitude: mean energy 0.01 -> -20 dB
        let quiet = SampleBuffer::from_slice(&[0.1; 16]);
        assert!((quiet.local_energy_db() + 20.0).abs() < 1e-4);

        assert_eq!(SampleBuffer::new(8).local_energy_db(), SILENT_LEVEL_DB);
    }
}
