//! Analysis windows

use std::f32::consts::PI;

/// Window shape applied before the FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum WindowKind {
    /// Symmetric Hann window (zero at both ends)
    #[default]
    Hann,
    /// Periodic Hamming window
    Hamming,
}

/// Precomputed window coefficients
#[derive(Debug, Clone)]
pub(crate) struct Window {
    coeffs: Vec<f32>,
}

impl Window {
    pub(crate) fn new(kind: WindowKind, size: usize) -> Self {
        match kind {
            WindowKind::Hann => Self::hann(size),
            WindowKind::Hamming => Self::hamming(size),
        }
    }

    /// Create a Hann window of the given size.
    ///
    /// The symmetric form divides by `size - 1`; a one-sample window has no
    /// taper and is returned as `[1.0]`.
    pub(crate) fn hann(size: usize) -> Self {
        if size <= 1 {
            return Self {
                coeffs: vec![1.0; size],
            };
        }

        let pi2 = 2.0 * PI;
        let coeffs = (0..size)
            .map(|i| 0.5 * (1.0 - (pi2 * i as f32 / (size - 1) as f32).cos()))
            .collect();
        Self { coeffs }
    }

    /// Create a periodic Hamming window of the given size
    pub(crate) fn hamming(size: usize) -> Self {
        let pi2 = 2.0 * PI;
        let coeffs = (0..size)
            .map(|i| 0.54 - 0.46 * (pi2 * i as f32 / size as f32).cos())
            .collect();
        Self { coeffs }
    }

    #[cfg(test)]
    pub(crate) fn coeffs(&self) -> &[f32] {
        &self.coeffs
    }

    /// Multiply `frame` by the window, elementwise
    pub(crate) fn apply(&self, frame: &mut [f32]) {
        debug_assert_eq!(frame.len(), self.coeffs.len());
        for (sample, w) in frame.iter_mut().zip(&self.coeffs) {
            *sample *= w;
        }
    }
}
