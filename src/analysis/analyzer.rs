//! Per-frame dominant frequency estimation

use log::debug;

use super::biquad::{LOWPASS_CUTOFF_HZ, LowPassCascade};
use super::fft::{Direction, FrequencyTable, Peak, SpectralTransform, find_peak};
use super::window::{Window, WindowKind};

/// Low-pass cascade, window, FFT and bin table for one stream.
///
/// Everything is sized once from the FFT size; `analyze` allocates nothing.
pub(crate) struct SpectrumAnalyzer {
    lowpass: LowPassCascade,
    window: Window,
    transform: SpectralTransform,
    freq_table: FrequencyTable,
    imag: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// `fft_exponent` is log2 of the frame size
    pub(crate) fn new(sample_rate: u32, fft_exponent: u32, window: WindowKind) -> Self {
        let transform = SpectralTransform::new(fft_exponent);
        let size = transform.len();
        let lowpass = LowPassCascade::new(sample_rate, LOWPASS_CUTOFF_HZ);

        let coeffs = lowpass.coefficients();
        debug!(
            "low-pass {} Hz: a = {:?}, b = {:?}",
            LOWPASS_CUTOFF_HZ, coeffs.a, coeffs.b
        );

        Self {
            lowpass,
            window: Window::new(window, size),
            transform,
            freq_table: FrequencyTable::new(sample_rate, size),
            imag: vec![0.0; size],
        }
    }

    pub(crate) fn frame_size(&self) -> usize {
        self.freq_table.len()
    }

    pub(crate) fn freq_table(&self) -> &FrequencyTable {
        &self.freq_table
    }

    /// Filter, window and transform `frame` in place, then locate the
    /// strongest bin below Nyquist.
    ///
    /// `frame` holds the spectrum's real part afterwards.
    pub(crate) fn analyze(&mut self, frame: &mut [f32]) -> Peak {
        self.lowpass.process_frame(frame);
        self.window.apply(frame);

        self.imag.fill(0.0);
        self.transform.apply(frame, &mut self.imag, Direction::Forward);

        // Frame size is at least 2, so the lower half has at least one bin
        let (bin, power) = find_peak(frame, &self.imag).unwrap_or((0, 0.0));

        Peak {
            bin,
            frequency: self.freq_table.get(bin),
            power,
        }
    }
}
