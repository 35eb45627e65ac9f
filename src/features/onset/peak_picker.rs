//! Adaptive peak picking on a streaming novelty curve
//!
//! Per hop:
//! 1. Append the novelty value to a window of `pre + post + 1` past values
//! 2. Smooth a copy of the window with a zero-phase low-pass biquad
//! 3. Threshold: `smoothed[post] - median(smoothed) - mean(window)·threshold`
//! 4. Slide the thresholded value into a 3-wide window and test its centre
//!    for a strict positive maximum, refined by quadratic interpolation
//!
//! # Reference
//!
//! Brossier, P., Bello, J. P., & Plumbley, M. D. (2004). Real-time temporal
//! segmentation of note objects in music signals.
//! *Proceedings of the International Computer Music Conference*.

use crate::buffer::sample_buffer::mean;
use crate::buffer::SampleBuffer;
use crate::dsp::stats::{is_peak, median_select, quadratic_peak_pos};
use crate::dsp::Filter;

/// Default threshold applied to the window mean
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Default number of past values before the tested position
pub const DEFAULT_WIN_PRE: usize = 1;

/// Default number of values after the tested position
pub const DEFAULT_WIN_POST: usize = 5;

/// Width of the thresholded-value window
const PEEK_LEN: usize = 3;

/// Streaming peak picker
#[derive(Debug, Clone)]
pub struct PeakPicker {
    threshold: f32,
    win_pre: usize,
    win_post: usize,
    biquad: Filter,
    /// Raw novelty history
    onset_keep: SampleBuffer,
    /// Smoothed copy of the history
    onset_proc: SampleBuffer,
    /// Last three thresholded values
    onset_peek: SampleBuffer,
    scratch: Vec<f32>,
    thresholded: f32,
}

impl Default for PeakPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakPicker {
    /// Peak picker with the default windows (1 before, 5 after)
    pub fn new() -> Self {
        Self::with_windows(DEFAULT_WIN_PRE, DEFAULT_WIN_POST)
    }

    /// Peak picker with custom window lengths
    pub fn with_windows(win_pre: usize, win_post: usize) -> Self {
        let len = win_pre + win_post + 1;
        Self {
            threshold: DEFAULT_THRESHOLD,
            win_pre,
            win_post,
            biquad: Filter::onset_smoothing(),
            onset_keep: SampleBuffer::new(len),
            onset_proc: SampleBuffer::new(len),
            onset_peek: SampleBuffer::new(PEEK_LEN),
            scratch: vec![0.0; len],
            thresholded: 0.0,
        }
    }

    /// Feed one novelty value
    ///
    /// Returns the interpolated peak position within the 3-wide window when
    /// the previous thresholded value is a peak, `None` otherwise. A reported
    /// position always lies strictly between 0.5 and 1.5.
    pub fn detect(&mut self, novelty: f32) -> Option<f32> {
        self.onset_keep.push(novelty);
        self.onset_proc.copy_from(self.onset_keep.as_slice());

        self.biquad
            .zero_phase_apply(self.onset_proc.as_mut_slice(), &mut self.scratch);

        let mean = mean(self.onset_keep.as_slice());
        self.scratch.copy_from_slice(self.onset_proc.as_slice());
        let median = median_select(&mut self.scratch);

        self.thresholded = self.onset_proc.get(self.win_post) - median - mean * self.threshold;
        self.onset_peek.push(self.thresholded);

        let peek = self.onset_peek.as_slice();
        if is_peak(peek, 1) {
            Some(quadratic_peak_pos(peek, 1))
        } else {
            None
        }
    }

    /// Set the threshold applied to the window mean
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    /// Threshold applied to the window mean
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Most recent thresholded value
    pub fn thresholded(&self) -> f32 {
        self.thresholded
    }

    /// Values kept before the tested position
    pub fn win_pre(&self) -> usize {
        self.win_pre
    }

    /// Values kept after the tested position
    pub fn win_post(&self) -> usize {
        self.win_post
    }

    /// Forget all novelty history
    pub fn reset(&mut self) {
        self.onset_keep.zeros();
        self.onset_proc.zeros();
        self.onset_peek.zeros();
        self.biquad.reset();
        self.thresholded = 0.0;
    }
}
