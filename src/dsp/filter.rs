//! Direct-form linear recursive (IIR) filter
//!
//! Implements
//!
//! ```text
//! y[n] = Σ_{l=0}^{K-1} b[l]·x[n-l] - Σ_{l=1}^{K-1} a[l]·y[n-l]
//! ```
//!
//! with `a[0] = 1`. Input and output histories are kept as shift registers
//! where index 0 is the most recent sample.

/// Low-pass biquad used to smooth the novelty window: butter(2, 0.34)
const SMOOTHING_B: [f32; 3] = [0.159_987_89, 0.319_975_77, 0.159_987_89];
const SMOOTHING_A1: f32 = 0.234_840_48;

/// Linear recursive filter of order `K` (K coefficients per side)
#[derive(Debug, Clone)]
pub struct Filter {
    /// Feedforward coefficients
    b: Vec<f32>,
    /// Feedback coefficients, `a[0] == 1` by convention
    a: Vec<f32>,
    /// Past inputs, most recent first
    x: Vec<f32>,
    /// Past outputs, most recent first
    y: Vec<f32>,
}

impl Filter {
    /// Create an identity filter of the given order (`b[0] = a[0] = 1`)
    ///
    /// An order-0 filter has no coefficients and leaves buffers untouched.
    pub fn new(order: usize) -> Self {
        let mut b = vec![0.0; order];
        let mut a = vec![0.0; order];
        if order > 0 {
            b[0] = 1.0;
            a[0] = 1.0;
        }
        Self {
            b,
            a,
            x: vec![0.0; order],
            y: vec![0.0; order],
        }
    }

    /// Create a filter from explicit coefficient sets
    ///
    /// The order is the longer of the two sets; the shorter one is padded
    /// with zeros.
    pub fn with_coefficients(b: &[f32], a: &[f32]) -> Self {
        let order = b.len().max(a.len());
        let mut filter = Self::new(order);
        filter.b.fill(0.0);
        filter.a.fill(0.0);
        filter.b[..b.len()].copy_from_slice(b);
        filter.a[..a.len()].copy_from_slice(a);
        filter
    }

    /// Order-3 biquad from its five normalized coefficients
    pub fn biquad(b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) -> Self {
        Self::with_coefficients(&[b0, b1, b2], &[1.0, a1, a2])
    }

    /// The low-pass biquad used to smooth onset novelty curves
    pub fn onset_smoothing() -> Self {
        Self::biquad(
            SMOOTHING_B[0],
            SMOOTHING_B[1],
            SMOOTHING_B[2],
            SMOOTHING_A1,
            0.0,
        )
    }

    /// Filter order (number of coefficients per side)
    pub fn order(&self) -> usize {
        self.b.len()
    }

    /// Feedforward coefficients
    pub fn feedforward(&self) -> &[f32] {
        &self.b
    }

    /// Feedback coefficients
    pub fn feedback(&self) -> &[f32] {
        &self.a
    }

    /// Filter `samples` in place, carrying history across calls
    pub fn apply(&mut self, samples: &mut [f32]) {
        let order = self.order();
        if order == 0 {
            return;
        }

        for sample in samples.iter_mut() {
            self.x[0] = *sample;
            let mut out = self.b[0] * self.x[0];
            for l in 1..order {
                out += self.b[l] * self.x[l];
                out -= self.a[l] * self.y[l];
            }
            self.y[0] = out;
            *sample = out;

            // Make room for the next sample
            for l in (1..order).rev() {
                self.x[l] = self.x[l - 1];
                self.y[l] = self.y[l - 1];
            }
        }
    }

    /// Forward-backward filtering, cancelling the filter's phase response
    ///
    /// `scratch` must hold at least as many samples as `samples`. History is
    /// cleared before returning, so consecutive calls are independent.
    pub fn zero_phase_apply(&mut self, samples: &mut [f32], scratch: &mut [f32]) {
        let len = samples.len();
        debug_assert!(scratch.len() >= len, "scratch shorter than the signal");
        let scratch = &mut scratch[..len];

        self.apply(samples);
        self.reset();

        for (dst, &src) in scratch.iter_mut().rev().zip(samples.iter()) {
            *dst = src;
        }

        self.apply(scratch);
        self.reset();

        for (dst, &src) in samples.iter_mut().zip(scratch.iter().rev()) {
            *dst = src;
        }
    }

    /// Clear the input and output history, keeping the coefficients
    pub fn reset(&mut self) {
        self.x.fill(0.0);
        self.y.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biquad_order() {
        let f = Filter::onset_smoothing();
        assert_eq!(f.order(), 3);
        assert_eq!(f.feedback()[0], 1.0);
        assert_eq!(f.feedback()[2], 0.0);
    }

    #[test]
    fn test_identity_zero_phase_is_exact() {
        let mut f = Filter::with_coefficients(&[1.0], &[1.0]);
        let original = vec![0.3, -1.2, 4.5, 0.0, 7.25, -0.001];
        let mut samples = original.clone();
        let mut scratch = vec![0.0; samples.len()];

        f.zero_phase_apply(&mut samples, &mut scratch);
        assert_eq!(samples, original);
    }

    #[test]
    fn test_order_zero_is_noop() {
        let mut f = Filter::new(0);
        let mut samples = vec![1.0, 2.0, 3.0];
        f.apply(&mut samples);
        assert_eq!(samples, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_direct_form_recursion() {
        // y[n] = x[n] + 0.5·x[n-1] - 0.25·y[n-1]
        let mut f = Filter::with_coefficients(&[1.0, 0.5], &[1.0, 0.25]);
        let mut samples = vec![1.0, 0.0, 0.0];
        f.apply(&mut samples);
        assert_eq!(samples[0], 1.0);
        assert!((samples[1] - 0.25).abs() < 1e-7);
        assert!((samples[2] + 0.0625).abs() < 1e-7);
    }

    #[test]
    fn test_history_carries_and_resets() {
        let mut f = Filter::onset_smoothing();
        let mut first = vec![1.0; 4];
        f.apply(&mut first);

        let mut continued = vec![1.0; 4];
        f.apply(&mut continued);

        f.reset();
        let mut fresh = vec![1.0; 4];
        f.apply(&mut fresh);

        assert_eq!(fresh, first, "reset must restore the initial state");
        assert_ne!(continued, first, "history must carry across calls");
    }

    #[test]
    fn test_zero_phase_smoothing_is_symmetric() {
        // A centred impulse must come out symmetric around its position
        let mut f = Filter::onset_smoothing();
        let mut samples = vec![0.0; 9];
        samples[4] = 1.0;
        let mut scratch = vec![0.0; 9];
        f.zero_phase_apply(&mut samples, &mut scratch);

        let peak = samples
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 4);
        assert!(samples[3] > 0.0 && samples[5] > 0.0);
    }
}
