//! Hop-by-hop onset detector
//!
//! Wires the phase vocoder, optional whitening and compression, the
//! descriptor bank and the peak picker together, then decides which peaks
//! become onsets.
//!
//! Acceptance rules, all in samples:
//! - A peak in a hop quieter than the silence gate is dropped.
//! - A candidate at `total_frames + round(pos·hop)` is accepted only past
//!   `last_onset + minioi`, and, once an onset exists, not before `delay`.
//! - While the stream is still inside its first `delay` samples, a non-silent
//!   hop without a peak emits an onset at the delay boundary, provided it is
//!   the very first hop or the minimum interval has elapsed.
//!
//! `last_onset` is stored delay-compensated: reported onset times subtract
//! `delay` again, clamped at zero.

use crate::buffer::SpectralFrame;
use crate::config::{MethodPreset, OnsetConfig};
use crate::dsp::stats::round_half_up;
use crate::dsp::PhaseVocoder;
use crate::error::AnalysisError;
use crate::preprocessing::compression::log_magnitude;
use crate::preprocessing::{AdaptiveWhitening, SilenceGate};

use super::{OnsetMethod, PeakPicker, SpectralDescriptor};

/// Streaming onset detector for one mono stream
///
/// All buffers are allocated by the constructor; [`process`](Self::process)
/// does not allocate. Use one instance per stream.
#[derive(Debug)]
pub struct OnsetDetector {
    method: OnsetMethod,
    window_size: usize,
    hop_size: usize,
    sample_rate: u32,

    pv: PhaseVocoder,
    whitening: AdaptiveWhitening,
    descriptor: SpectralDescriptor,
    peak_picker: PeakPicker,
    frame: SpectralFrame,
    desc: f32,

    silence: SilenceGate,
    /// Minimum inter-onset interval in samples
    minioi: usize,
    /// Start delay in samples
    delay: usize,
    total_frames: usize,
    last_onset: usize,

    apply_whitening: bool,
    apply_compression: bool,
    lambda_compression: f32,
}

impl OnsetDetector {
    /// Create a detector for a mode string with that mode's default parameters
    ///
    /// # Arguments
    ///
    /// * `mode` - Descriptor name (`energy`, `specdiff`, `hfc`, `complex`,
    ///   `phase`, `wphase`, `kl`, `mkl`, `specflux`, `default`, `old_default`),
    ///   case-insensitive; unknown names fall back to HFC
    /// * `window_size` - Analysis window in samples (typically 512 or 1024)
    /// * `hop_size` - Samples consumed per [`process`](Self::process) call
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if any size or the sample rate is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_onset::OnsetDetector;
    ///
    /// let mut detector = OnsetDetector::new("hfc", 512, 256, 44100)?;
    /// let hop = vec![0.0f32; 256];
    /// let onset = detector.process(&hop)?;
    /// assert_eq!(onset, 0.0);
    /// # Ok::<(), stratum_onset::AnalysisError>(())
    /// ```
    pub fn new(
        mode: &str,
        window_size: usize,
        hop_size: usize,
        sample_rate: u32,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        let pv = PhaseVocoder::new(window_size, hop_size)?;
        let preset = MethodPreset::for_mode(mode);

        let mut detector = Self {
            method: preset.method,
            window_size,
            hop_size,
            sample_rate,
            pv,
            whitening: AdaptiveWhitening::new(window_size, hop_size, sample_rate),
            descriptor: SpectralDescriptor::new(preset.method, window_size),
            peak_picker: PeakPicker::new(),
            frame: SpectralFrame::new(window_size),
            desc: 0.0,
            silence: SilenceGate::default(),
            minioi: 0,
            delay: 0,
            total_frames: 0,
            last_onset: 0,
            apply_whitening: false,
            apply_compression: false,
            lambda_compression: 0.0,
        };
        detector.apply_preset(&preset);
        detector.reset();

        log::debug!(
            "Onset detector: mode={:?} -> {}, window={}, hop={}, rate={} Hz, threshold={:.3}, delay={} samples, minioi={} samples, whitening={}, compression={}",
            mode,
            detector.method,
            window_size,
            hop_size,
            sample_rate,
            detector.threshold(),
            detector.delay,
            detector.minioi,
            detector.apply_whitening,
            detector.compression()
        );

        Ok(detector)
    }

    /// Create a detector from an [`OnsetConfig`], applying its overrides
    ///
    /// # Errors
    ///
    /// Same as [`OnsetDetector::new`].
    pub fn from_config(config: &OnsetConfig) -> Result<Self, AnalysisError> {
        let mut detector = Self::new(
            &config.method,
            config.window_size,
            config.hop_size,
            config.sample_rate,
        )?;
        if let Some(threshold) = config.threshold {
            detector.set_threshold(threshold);
        }
        if let Some(silence_db) = config.silence_db {
            detector.set_silence(silence_db);
        }
        if let Some(minioi_ms) = config.minioi_ms {
            detector.set_minioi_ms(minioi_ms);
        }
        if let Some(delay_ms) = config.delay_ms {
            detector.set_delay_ms(delay_ms);
        }
        if let Some(whitening) = config.whitening {
            detector.set_awhitening(whitening);
        }
        if let Some(lambda) = config.compression {
            detector.set_compression(lambda);
        }
        Ok(detector)
    }

    fn apply_preset(&mut self, preset: &MethodPreset) {
        self.set_threshold(preset.threshold);
        self.set_delay((preset.delay_hops * self.hop_size as f32) as usize);
        self.set_minioi_ms(preset.minioi_ms);
        self.set_silence(preset.silence_db);
        self.set_awhitening(preset.whitening);
        self.set_compression(preset.compression);
        if let Some(relax_time) = preset.whitening_relax_time {
            self.whitening.set_relax_time(relax_time);
        }
        if let Some(floor) = preset.whitening_floor {
            self.whitening.set_floor(floor);
        }
    }

    /// Process one hop of samples
    ///
    /// Returns the onset position within the hop pipeline when an onset is
    /// accepted (always > 0), or 0.0 when there is none. The accepted onset
    /// time is then available from [`last_onset`](Self::last_onset).
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `input.len()` differs from the
    /// hop size.
    pub fn process(&mut self, input: &[f32]) -> Result<f32, AnalysisError> {
        if input.len() != self.hop_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Expected {} samples per hop, got {}",
                self.hop_size,
                input.len()
            )));
        }

        self.pv.analyze(input, &mut self.frame);
        if self.apply_whitening {
            self.whitening.apply(&mut self.frame);
        }
        if self.apply_compression {
            log_magnitude(&mut self.frame, self.lambda_compression);
        }
        self.desc = self.descriptor.compute(&self.frame);

        let silent = self.silence.is_silent(input);
        let mut onset = 0.0;

        match self.peak_picker.detect(self.desc) {
            Some(_) if silent => {
                log::trace!("Peak at sample {} dropped: silent hop", self.total_frames);
            }
            Some(pos) => {
                let candidate =
                    self.total_frames + round_half_up(pos * self.hop_size as f32) as usize;
                if self.last_onset.saturating_add(self.minioi) < candidate {
                    if self.last_onset > 0 && self.delay > candidate {
                        log::trace!("Onset at sample {} dropped: inside start delay", candidate);
                    } else {
                        self.last_onset = self.delay.max(candidate);
                        onset = pos;
                        log::trace!("Onset accepted at sample {}", self.last_onset);
                    }
                } else {
                    log::trace!(
                        "Onset at sample {} dropped: within {} samples of the previous one",
                        candidate,
                        self.minioi
                    );
                }
            }
            None => {
                if self.total_frames <= self.delay
                    && !silent
                    && (self.total_frames == 0
                        || self.last_onset.saturating_add(self.minioi) < self.total_frames)
                {
                    onset = self.delay as f32 / self.hop_size as f32;
                    self.last_onset = self.total_frames.saturating_add(self.delay);
                    log::trace!("Start-of-stream onset at sample {}", self.total_frames);
                }
            }
        }

        self.total_frames += self.hop_size;
        Ok(onset)
    }

    /// Time of the latest onset in samples, delay-compensated
    pub fn last_onset(&self) -> usize {
        self.last_onset.saturating_sub(self.delay)
    }

    /// Time of the latest onset in seconds
    pub fn last_onset_s(&self) -> f32 {
        self.last_onset() as f32 / self.sample_rate as f32
    }

    /// Time of the latest onset in milliseconds
    pub fn last_onset_ms(&self) -> f32 {
        self.last_onset_s() * 1000.0
    }

    /// Enable or disable adaptive whitening
    pub fn set_awhitening(&mut self, enable: bool) {
        self.apply_whitening = enable;
    }

    /// Whether adaptive whitening is enabled
    pub fn awhitening(&self) -> bool {
        self.apply_whitening
    }

    /// Whitening stage, for inspecting relax time, floor and decay
    pub fn whitening(&self) -> &AdaptiveWhitening {
        &self.whitening
    }

    /// Whitening stage, for tuning relax time and floor
    pub fn whitening_mut(&mut self) -> &mut AdaptiveWhitening {
        &mut self.whitening
    }

    /// Set the log-compression λ; 0 disables compression
    ///
    /// Negative values are ignored.
    pub fn set_compression(&mut self, lambda: f32) {
        if lambda < 0.0 {
            log::warn!("Ignoring negative compression lambda {}", lambda);
            return;
        }
        self.lambda_compression = lambda;
        self.apply_compression = lambda > 0.0;
    }

    /// Log-compression λ, 0 when compression is disabled
    pub fn compression(&self) -> f32 {
        if self.apply_compression {
            self.lambda_compression
        } else {
            0.0
        }
    }

    /// Set the silence gate in dB
    pub fn set_silence(&mut self, silence_db: f32) {
        self.silence.threshold_db = silence_db;
    }

    /// Silence gate in dB
    pub fn silence(&self) -> f32 {
        self.silence.threshold_db
    }

    /// Set the peak-picking threshold
    pub fn set_threshold(&mut self, threshold: f32) {
        self.peak_picker.set_threshold(threshold);
    }

    /// Peak-picking threshold
    pub fn threshold(&self) -> f32 {
        self.peak_picker.threshold()
    }

    /// Set the minimum inter-onset interval in samples
    pub fn set_minioi(&mut self, minioi: usize) {
        self.minioi = minioi;
    }

    /// Minimum inter-onset interval in samples
    pub fn minioi(&self) -> usize {
        self.minioi
    }

    /// Set the minimum inter-onset interval in seconds (rounded to samples)
    pub fn set_minioi_s(&mut self, minioi: f32) {
        self.set_minioi(round_half_up(minioi * self.sample_rate as f32) as usize);
    }

    /// Minimum inter-onset interval in seconds
    pub fn minioi_s(&self) -> f32 {
        self.minioi as f32 / self.sample_rate as f32
    }

    /// Set the minimum inter-onset interval in milliseconds
    pub fn set_minioi_ms(&mut self, minioi: f32) {
        self.set_minioi_s(minioi / 1000.0);
    }

    /// Minimum inter-onset interval in milliseconds
    pub fn minioi_ms(&self) -> f32 {
        self.minioi_s() * 1000.0
    }

    /// Set the start delay in samples
    pub fn set_delay(&mut self, delay: usize) {
        self.delay = delay;
    }

    /// Start delay in samples
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Set the start delay in seconds (truncated to samples)
    pub fn set_delay_s(&mut self, delay: f32) {
        self.set_delay((delay * self.sample_rate as f32) as usize);
    }

    /// Start delay in seconds
    pub fn delay_s(&self) -> f32 {
        self.delay as f32 / self.sample_rate as f32
    }

    /// Set the start delay in milliseconds
    pub fn set_delay_ms(&mut self, delay: f32) {
        self.set_delay_s(delay / 1000.0);
    }

    /// Start delay in milliseconds
    pub fn delay_ms(&self) -> f32 {
        self.delay_s() * 1000.0
    }

    /// Raw descriptor value of the last processed hop
    pub fn descriptor(&self) -> f32 {
        self.desc
    }

    /// Thresholded descriptor value of the last processed hop
    pub fn thresholded_descriptor(&self) -> f32 {
        self.peak_picker.thresholded()
    }

    /// Descriptor in use
    pub fn method(&self) -> OnsetMethod {
        self.method
    }

    /// Analysis window size in samples
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Hop size in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples processed since construction or the last reset
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Clear the timing counters for a new stream
    ///
    /// Configuration is kept, and so is the spectral and novelty history.
    pub fn reset(&mut self) {
        self.last_onset = 0;
        self.total_frames = 0;
    }
}
