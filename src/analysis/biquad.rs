//! Second-order low-pass section used as a two-stage cascade ahead of the FFT

use std::f32::consts::PI;

/// Cutoff of the anti-aliasing low-pass cascade
pub(crate) const LOWPASS_CUTOFF_HZ: f32 = 330.0;

/// Normalized low-pass coefficients (a0 already divided out)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FilterCoefficients {
    /// Feedback coefficients
    pub(crate) a: [f32; 2],
    /// Feedforward coefficients
    pub(crate) b: [f32; 3],
}

impl FilterCoefficients {
    /// Compute second-order low-pass coefficients for the given cutoff.
    ///
    /// No Nyquist check is made: a cutoff at or above `sample_rate / 2`
    /// produces whatever the formulas give.
    pub(crate) fn low_pass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / 2.0 * 2.0f32.sqrt();

        let a0 = 1.0 + alpha;
        let b0 = ((1.0 - cos_w0) / 2.0) / a0;

        Self {
            a: [(-2.0 * cos_w0) / a0, (1.0 - alpha) / a0],
            b: [b0, (1.0 - cos_w0) / a0, b0],
        }
    }
}

/// Stateful biquad section.
///
/// State layout: `[x(n-1), x(n-2), y(n-1), y(n-2)]`. The state is never reset
/// between frames, so consecutive frames see a continuous IIR response.
#[derive(Debug, Clone)]
pub(crate) struct BiquadFilter {
    coeffs: FilterCoefficients,
    state: [f32; 4],
}

impl BiquadFilter {
    pub(crate) fn new(coeffs: FilterCoefficients) -> Self {
        Self {
            coeffs,
            state: [0.0; 4],
        }
    }

    /// Filter one sample
    #[inline]
    pub(crate) fn process(&mut self, x: f32) -> f32 {
        let FilterCoefficients { a, b } = self.coeffs;
        let s = &mut self.state;

        let y = b[0] * x + b[1] * s[0] + b[2] * s[1] - a[0] * s[2] - a[1] * s[3];

        s[1] = s[0];
        s[0] = x;
        s[3] = s[2];
        s[2] = y;

        y
    }

    /// Filter a whole frame in place
    pub(crate) fn process_frame(&mut self, frame: &mut [f32]) {
        for sample in frame.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> [f32; 4] {
        self.state
    }
}

/// Fourth-order low-pass built from two identical sections.
///
/// Section 1 runs over the full frame before section 2 sees any of it.
#[derive(Debug, Clone)]
pub(crate) struct LowPassCascade {
    stages: [BiquadFilter; 2],
}

impl LowPassCascade {
    pub(crate) fn new(sample_rate: u32, cutoff_hz: f32) -> Self {
        let coeffs = FilterCoefficients::low_pass(sample_rate as f32, cutoff_hz);
        Self {
            stages: [BiquadFilter::new(coeffs), BiquadFilter::new(coeffs)],
        }
    }

    pub(crate) fn coefficients(&self) -> FilterCoefficients {
        self.stages[0].coeffs
    }

    pub(crate) fn process_frame(&mut self, frame: &mut [f32]) {
        for stage in self.stages.iter_mut() {
            stage.process_frame(frame);
        }
    }
}
