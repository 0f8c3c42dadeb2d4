//! Frame loop: read, analyze, emit, then check for a stop request

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace, warn};

use crate::analysis::{SpectrumAnalyzer, rms};
use crate::audio::{FrameRead, SampleReader};
use crate::config::{Config, OutputField, PartialFramePolicy};
use crate::error::Result;
use crate::output::{FrameResult, write_result_line};

/// Cooperative stop request, shared with signal handlers.
///
/// The pipeline only looks at it between frames.
#[derive(Debug, Clone, Default)]
pub(crate) struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Underlying flag, for handlers that set it directly
    pub(crate) fn as_atomic(&self) -> &Arc<AtomicBool> {
        &self.0
    }
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    StopRequested,
    EndOfStream,
    /// Input ended in the middle of a frame
    PartialFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    /// Frames analyzed and emitted
    pub(crate) frames: u64,
    pub(crate) reason: StopReason,
}

pub(crate) struct Pipeline {
    fields: Vec<OutputField>,
    spectrum: Option<SpectrumAnalyzer>,
    want_rms: bool,
    partial_frame: PartialFramePolicy,
    frame: Vec<f32>,
    stop: StopFlag,
}

impl Pipeline {
    /// Build the pipeline from an already validated configuration
    pub(crate) fn new(config: &Config, stop: StopFlag) -> Self {
        let fields = config.output_fields();
        let spectrum = fields.iter().any(|f| f.needs_spectrum()).then(|| {
            SpectrumAnalyzer::new(config.sample_rate, config.fft_exponent(), config.window)
        });
        let want_rms = fields.contains(&OutputField::Rms);

        if let Some(analyzer) = &spectrum {
            debug!(
                "frame size {} (2^{}), bin width {} Hz",
                analyzer.frame_size(),
                config.fft_exponent(),
                analyzer.freq_table().bin_width()
            );
        }

        Self {
            fields,
            spectrum,
            want_rms,
            partial_frame: config.partial_frame,
            frame: vec![0.0; config.fft_size],
            stop,
        }
    }

    pub(crate) fn frame_size(&self) -> usize {
        self.frame.len()
    }

    /// Analyze the current frame buffer
    fn process_frame(&mut self) -> FrameResult {
        // RMS reads the raw samples, before the spectrum path filters them in place
        let rms = self.want_rms.then(|| rms(&self.frame));
        let peak = self
            .spectrum
            .as_mut()
            .map(|analyzer| analyzer.analyze(&mut self.frame));

        if let Some(peak) = &peak {
            trace!("peak bin {} ({} Hz), power {}", peak.bin, peak.frequency, peak.power);
        }

        FrameResult { peak, rms }
    }

    /// Run until a stop is requested or the input ends.
    ///
    /// The stop flag is checked before each read, so a frame that has been
    /// read is always analyzed and emitted in full.
    pub(crate) fn run<R: Read, W: Write>(
        &mut self,
        input: &mut SampleReader<R>,
        out: &mut W,
    ) -> Result<RunSummary> {
        let mut frames = 0u64;

        let reason = loop {
            if self.stop.is_requested() {
                info!("stop requested after {} frames", frames);
                break StopReason::StopRequested;
            }

            match input.read_frame(&mut self.frame)? {
                FrameRead::Full => {}
                FrameRead::EndOfStream => {
                    info!("end of input after {} frames", frames);
                    break StopReason::EndOfStream;
                }
                FrameRead::Partial(samples) => match self.partial_frame {
                    PartialFramePolicy::Discard => {
                        warn!(
                            "input ended mid-frame; discarding {} of {} samples",
                            samples,
                            self.frame.len()
                        );
                        break StopReason::PartialFrame;
                    }
                    PartialFramePolicy::Process => {
                        warn!(
                            "input ended mid-frame; analyzing {} new samples with {} stale ones",
                            samples,
                            self.frame.len() - samples
                        );
                        let result = self.process_frame();
                        write_result_line(out, &self.fields, &result)?;
                        frames += 1;
                        break StopReason::PartialFrame;
                    }
                },
            }

            let result = self.process_frame();
            write_result_line(out, &self.fields, &result)?;
            frames += 1;
        };

        Ok(RunSummary { frames, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use std::io::Cursor;

    fn to_bytes(samples: &[f32]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
    }

    fn run_on(config: &Config, samples: &[f32], stop: StopFlag) -> (RunSummary, String) {
        let mut pipeline = Pipeline::new(config, stop);
        let mut reader = SampleReader::new(Cursor::new(to_bytes(samples)), pipeline.frame_size());
        let mut out = Vec::new();
        let summary = pipeline.run(&mut reader, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    /// Reader that raises the stop flag when the first read happens, standing
    /// in for a signal arriving mid-read
    struct StopOnRead {
        data: Cursor<Vec<u8>>,
        stop: StopFlag,
    }

    impl Read for StopOnRead {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.stop.request();
            self.data.read(buf)
        }
    }

    #[test]
    fn test_zero_frame_prints_zeros() {
        let config = Config {
            sample_rate: 8000,
            fft_size: 8,
            frequency: true,
            rms: true,
            ..Config::default()
        };
        let (summary, out) = run_on(&config, &[0.0; 8], StopFlag::new());
        assert_eq!(out, "0 0\n");
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.reason, StopReason::EndOfStream);
    }

    #[test]
    fn test_stop_before_run_reads_nothing() {
        let config = Config {
            fft_size: 8,
            rms: true,
            ..Config::default()
        };
        let stop = StopFlag::new();
        stop.request();
        let (summary, out) = run_on(&config, &[1.0; 32], stop);
        assert_eq!(out, "");
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.reason, StopReason::StopRequested);
    }

    #[test]
    fn test_stop_during_read_finishes_frame() {
        let config = Config {
            fft_size: 4,
            rms: true,
            ..Config::default()
        };
        let stop = StopFlag::new();
        let mut pipeline = Pipeline::new(&config, stop.clone());
        let source = StopOnRead {
            data: Cursor::new(to_bytes(&[2.0; 12])),
            stop,
        };
        let mut reader = SampleReader::new(source, 4);
        let mut out = Vec::new();

        let summary = pipeline.run(&mut reader, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2\n");
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.reason, StopReason::StopRequested);
    }

    #[test]
    fn test_partial_frame_discarded_by_default() {
        let config = Config {
            fft_size: 4,
            rms: true,
            ..Config::default()
        };
        let (summary, out) = run_on(&config, &[1.0, 1.0, 1.0, 1.0, 3.0], StopFlag::new());
        assert_eq!(out, "1\n");
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.reason, StopReason::PartialFrame);
    }

    #[test]
    fn test_partial_frame_processed_with_stale_tail() {
        let config = Config {
            fft_size: 4,
            rms: true,
            partial_frame: PartialFramePolicy::Process,
            ..Config::default()
        };
        // Second frame is [3, 1, 1, 1]: rms = sqrt(12 / 4)
        let (summary, out) = run_on(&config, &[1.0, 1.0, 1.0, 1.0, 3.0], StopFlag::new());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: f32 = lines[1].parse().unwrap();
        assert!((second - 3.0f32.sqrt()).abs() < 1e-6, "got {}", second);
        assert_eq!(summary.frames, 2);
    }

    #[test]
    fn test_no_fields_emits_blank_lines() {
        let config = Config {
            fft_size: 4,
            ..Config::default()
        };
        let (summary, out) = run_on(&config, &[0.5; 8], StopFlag::new());
        assert_eq!(out, "\n\n");
        assert_eq!(summary.frames, 2);
    }

    #[test]
    fn test_rms_uses_unfiltered_samples() {
        let config = Config {
            fft_size: 64,
            frequency: true,
            amplitude: true,
            rms: true,
            ..Config::default()
        };
        let (_, out) = run_on(&config, &[0.25; 64], StopFlag::new());
        let fields: Vec<f32> = out.trim_end().split(' ').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 3);
        assert!((fields[2] - 0.25).abs() < 1e-6, "rms was {}", fields[2]);
    }

    #[test]
    fn test_tone_tracked_across_frames() {
        let config = Config {
            sample_rate: 8000,
            fft_size: 1024,
            frequency: true,
            ..Config::default()
        };
        let freq = 250.0;
        let samples: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * freq * i as f32 / 8000.0).sin() * 0.5)
            .collect();
        let (summary, out) = run_on(&config, &samples, StopFlag::new());
        assert_eq!(summary.frames, 4);

        let bin_width = 8000.0 / 1024.0;
        for line in out.lines().skip(1) {
            let detected: f32 = line.parse().unwrap();
            assert!(
                (detected - freq).abs() <= bin_width,
                "expected ~{} Hz, got {}",
                freq,
                detected
            );
        }
    }
}
