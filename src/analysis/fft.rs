//! FFT adapter, bin frequencies and peak search

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    /// Unnormalized inverse transform
    #[cfg_attr(not(test), allow(dead_code))]
    Inverse,
}

/// Power-of-two complex FFT over split real/imaginary buffers.
///
/// Plans and buffers are created once; dropping the value releases them.
pub(crate) struct SpectralTransform {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectralTransform {
    /// Plan a transform of `2^log2_size` points
    pub(crate) fn new(log2_size: u32) -> Self {
        let size = 1usize << log2_size;
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            forward,
            inverse,
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Transform `re` and `im` in place.
    ///
    /// Both slices must be exactly `len()` long.
    pub(crate) fn apply(&mut self, re: &mut [f32], im: &mut [f32], direction: Direction) {
        assert_eq!(re.len(), self.buffer.len(), "real buffer length mismatch");
        assert_eq!(im.len(), self.buffer.len(), "imaginary buffer length mismatch");

        for ((c, &r), &i) in self.buffer.iter_mut().zip(re.iter()).zip(im.iter()) {
            *c = Complex::new(r, i);
        }

        let fft = match direction {
            Direction::Forward => &self.forward,
            Direction::Inverse => &self.inverse,
        };
        fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        for ((c, r), i) in self.buffer.iter().zip(re.iter_mut()).zip(im.iter_mut()) {
            *r = c.re;
            *i = c.im;
        }
    }
}

/// Center frequency of every FFT bin
#[derive(Debug, Clone)]
pub(crate) struct FrequencyTable {
    freqs: Vec<f32>,
}

impl FrequencyTable {
    pub(crate) fn new(sample_rate: u32, fft_size: usize) -> Self {
        let freqs = (0..fft_size)
            .map(|i| (sample_rate as u64 * i as u64) as f32 / fft_size as f32)
            .collect();
        Self { freqs }
    }

    pub(crate) fn get(&self, bin: usize) -> f32 {
        self.freqs[bin]
    }

    pub(crate) fn len(&self) -> usize {
        self.freqs.len()
    }

    /// Frequency spacing between adjacent bins
    pub(crate) fn bin_width(&self) -> f32 {
        self.freqs.get(1).copied().unwrap_or(0.0)
    }
}

/// Strongest bin of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Peak {
    pub(crate) bin: usize,
    pub(crate) frequency: f32,
    /// Squared magnitude of the bin
    pub(crate) power: f32,
}

/// Find the bin with the highest power in the lower half of the spectrum.
///
/// Returns `(bin, power)`. On equal power the lower bin wins. Returns `None`
/// when there are fewer than two bins.
pub(crate) fn find_peak(re: &[f32], im: &[f32]) -> Option<(usize, f32)> {
    let half = re.len().min(im.len()) / 2;

    // The maximum starts over on every call; a loud earlier frame never
    // masks a quieter later one.
    let mut best: Option<(usize, f32)> = None;
    for (bin, (&r, &i)) in re[..half].iter().zip(&im[..half]).enumerate() {
        let power = r * r + i * i;
        let replace = match best {
            Some((_, max)) => power > max,
            None => true,
        };
        if replace {
            best = Some((bin, power));
        }
    }
    best
}
