mod analysis;
mod audio;
mod config;
mod error;
mod output;
mod pipeline;
mod signal;

use std::io::{self, ErrorKind};

use clap::{ArgAction, Parser};
use log::debug;

use analysis::{LOWPASS_CUTOFF_HZ, WindowKind};
use audio::SampleReader;
use config::{Config, DEFAULT_FFT_SIZE, DEFAULT_SAMPLE_RATE, PartialFramePolicy};
use error::{Error, Result};
use output::{print_error, print_warning};
use pipeline::{Pipeline, StopFlag};

#[derive(Parser)]
#[command(
    name = "analyze-signal",
    version,
    about = "Simple command-line signal processing on a raw float PCM stream",
    long_about = "Reads 1-channel, native-endian 32-bit floating-point PCM from stdin and prints
one line per FFT frame with the dominant frequency, its power and/or the RMS
amplitude of the frame. The stream's sample rate must match --sample-rate.

Output fields appear in the order FREQUENCY AMPLITUDE RMS, where AMPLITUDE is
the power of FREQUENCY in the signal. Frequency resolution is
sample_rate / fft_size: 8000 / 8192 gives bins of about 1 Hz.",
    after_help = "Examples:
  sox in.wav -r 8000 -t raw -e floating-point - remix 1,2 | analyze-signal -f -a -R
  analyze-signal -r 44100 -s 4096 -f < tone.raw           Frequency only
  analyze-signal -R --partial-frame process < short.raw   Keep a short final frame",
    arg_required_else_help = true
)]
struct Args {
    /// Sample rate of the incoming signal
    #[arg(short = 'r', long, default_value_t = DEFAULT_SAMPLE_RATE, value_name = "RATE")]
    sample_rate: u32,

    /// FFT size (power of two, at most 2^24); lower is faster but less accurate
    #[arg(short = 's', long, default_value_t = DEFAULT_FFT_SIZE, value_name = "SIZE")]
    fft_size: usize,

    /// Show the dominant frequency
    #[arg(short, long)]
    frequency: bool,

    /// Show the power of the dominant frequency (requires --frequency)
    #[arg(short, long)]
    amplitude: bool,

    /// Show the root-mean-square amplitude of the whole frame
    #[arg(short = 'R', long)]
    rms: bool,

    /// Analysis window applied before the FFT
    #[arg(short, long, value_enum, default_value_t = WindowKind::Hann)]
    window: WindowKind,

    /// What to do with a final frame cut short by the end of input
    #[arg(long, value_enum, default_value_t = PartialFramePolicy::Discard)]
    partial_frame: PartialFramePolicy,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            sample_rate: self.sample_rate,
            fft_size: self.fft_size,
            frequency: self.frequency,
            amplitude: self.amplitude,
            rms: self.rms,
            window: self.window,
            partial_frame: self.partial_frame,
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;

    if config.frequency && config.sample_rate as f32 / 2.0 <= LOWPASS_CUTOFF_HZ {
        print_warning(&format!(
            "low-pass cutoff {} Hz is not below Nyquist for sample rate {}",
            LOWPASS_CUTOFF_HZ, config.sample_rate
        ));
    }

    let stop = StopFlag::new();
    signal::register_stop_signals(&stop)?;

    let mut pipeline = Pipeline::new(config, stop);
    let mut reader = SampleReader::new(io::stdin().lock(), pipeline.frame_size());
    let mut out = io::stdout().lock();

    let summary = pipeline.run(&mut reader, &mut out)?;
    debug!("{} frames, stopped by {:?}", summary.frames, summary.reason);
    Ok(())
}

fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    init_logging(args.verbose);

    match run(&args.config()) {
        Ok(()) => {}
        // Downstream reader went away; nothing left to do
        Err(Error::Io(e)) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("output closed: {}", e);
        }
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    }
}
