//! Validated runtime configuration

use crate::analysis::WindowKind;
use crate::error::ConfigError;

pub(crate) const DEFAULT_SAMPLE_RATE: u32 = 8000;
pub(crate) const DEFAULT_FFT_SIZE: usize = 8192;
/// Largest accepted FFT size (2^24 samples, 64 MiB per f32 buffer)
pub(crate) const MAX_FFT_SIZE: usize = 1 << 24;

/// What to do with a final frame cut short by the end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum PartialFramePolicy {
    /// Drop the incomplete frame and stop
    #[default]
    Discard,
    /// Analyze it once, with the buffer's previous contents left in the tail
    Process,
}

/// One column of a result line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputField {
    /// Dominant frequency in Hz
    Frequency,
    /// Power of the dominant bin
    Amplitude,
    /// RMS of the raw frame
    Rms,
}

impl OutputField {
    /// Whether this field needs the filter/FFT path
    pub(crate) fn needs_spectrum(self) -> bool {
        matches!(self, OutputField::Frequency | OutputField::Amplitude)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) sample_rate: u32,
    pub(crate) fft_size: usize,
    pub(crate) frequency: bool,
    pub(crate) amplitude: bool,
    pub(crate) rms: bool,
    pub(crate) window: WindowKind,
    pub(crate) partial_frame: PartialFramePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            fft_size: DEFAULT_FFT_SIZE,
            frequency: false,
            amplitude: false,
            rms: false,
            window: WindowKind::default(),
            partial_frame: PartialFramePolicy::default(),
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.amplitude && !self.frequency {
            return Err(ConfigError::AmplitudeWithoutFrequency);
        }
        if !(2..=MAX_FFT_SIZE).contains(&self.fft_size) || !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        Ok(())
    }

    /// log2 of the FFT size. Only meaningful after `validate`.
    pub(crate) fn fft_exponent(&self) -> u32 {
        self.fft_size.trailing_zeros()
    }

    /// Enabled output fields, in output order
    pub(crate) fn output_fields(&self) -> Vec<OutputField> {
        [
            (self.frequency, OutputField::Frequency),
            (self.amplitude, OutputField::Amplitude),
            (self.rms, OutputField::Rms),
        ]
        .into_iter()
        .filter_map(|(enabled, field)| enabled.then_some(field))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.fft_size, 8192);
        assert_eq!(config.fft_exponent(), 13);
        assert!(config.output_fields().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_amplitude_requires_frequency() {
        let config = Config {
            amplitude: true,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::AmplitudeWithoutFrequency)
        );

        let config = Config {
            amplitude: true,
            frequency: true,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fft_size_must_be_power_of_two() {
        for size in [0, 1, 3, 1000, 8191] {
            let config = Config {
                fft_size: size,
                ..Config::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::FftSize(size)));
        }
        for size in [2, 8, 1024, 65536] {
            let config = Config {
                fft_size: size,
                ..Config::default()
            };
            assert!(config.validate().is_ok(), "size {} should be valid", size);
        }
    }

    #[test]
    fn test_fft_size_upper_bound() {
        let config = Config {
            fft_size: MAX_FFT_SIZE,
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        for size in [MAX_FFT_SIZE * 2, 1 << (usize::BITS - 1)] {
            let config = Config {
                fft_size: size,
                ..Config::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::FftSize(size)));
        }
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = Config {
            sample_rate: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SampleRate(0)));
    }

    #[test]
    fn test_fft_exponent() {
        let config = Config {
            fft_size: 1024,
            ..Config::default()
        };
        assert_eq!(config.fft_exponent(), 10);
    }

    #[test]
    fn test_output_fields_fixed_order() {
        let config = Config {
            frequency: true,
            amplitude: true,
            rms: true,
            ..Config::default()
        };
        assert_eq!(
            config.output_fields(),
            vec![
                OutputField::Frequency,
                OutputField::Amplitude,
                OutputField::Rms
            ]
        );

        let config = Config {
            rms: true,
            frequency: true,
            ..Config::default()
        };
        assert_eq!(
            config.output_fields(),
            vec![OutputField::Frequency, OutputField::Rms]
        );
    }

    #[test]
    fn test_needs_spectrum() {
        assert!(OutputField::Frequency.needs_spectrum());
        assert!(OutputField::Amplitude.needs_spectrum());
        assert!(!OutputField::Rms.needs_spectrum());
    }
}
