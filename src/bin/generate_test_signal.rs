use std::f32::consts::PI;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

/// Write a raw mono native-endian f32 test signal (sum of sine tones)
#[derive(Parser)]
#[command(name = "generate_test_signal", version)]
struct Args {
    /// Tone frequencies in Hz; the signal is their sum
    #[arg(required = true, value_name = "HZ")]
    freqs: Vec<f32>,

    /// Sample rate
    #[arg(short = 'r', long, default_value_t = 8000)]
    sample_rate: u32,

    /// Length in seconds
    #[arg(short, long, default_value_t = 3.0)]
    duration: f32,

    /// Peak amplitude of the summed signal
    #[arg(short, long, default_value_t = 0.5)]
    amplitude: f32,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn tones(freqs: &[f32], amplitude: f32, duration: f32, sample_rate: u32) -> Vec<f32> {
    let n = (duration * sample_rate as f32) as usize;
    // Split the amplitude so the sum never exceeds it
    let amp = amplitude / freqs.len() as f32;

    (0..n)
        .map(|i| {
            freqs
                .iter()
                .map(|&f| amp * (2.0 * PI * f * i as f32 / sample_rate as f32).sin())
                .sum()
        })
        .collect()
}

fn write_raw<W: Write>(writer: &mut W, samples: &[f32]) -> io::Result<()> {
    for &sample in samples {
        writer.write_all(&sample.to_ne_bytes())?;
    }
    writer.flush()
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let samples = tones(&args.freqs, args.amplitude, args.duration, args.sample_rate);

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_raw(&mut writer, &samples)?;
            eprintln!("Generated: {} ({} samples)", path.display(), samples.len());
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            write_raw(&mut writer, &samples)?;
        }
    }
    Ok(())
}
