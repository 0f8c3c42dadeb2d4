//! Frame analysis: low-pass cascade, windowing, FFT peak search and RMS

mod analyzer;
mod biquad;
mod fft;
mod rms;
mod window;

pub(crate) use analyzer::SpectrumAnalyzer;
pub(crate) use biquad::LOWPASS_CUTOFF_HZ;
pub(crate) use fft::Peak;
pub(crate) use rms::rms;
pub(crate) use window::WindowKind;
