//! Common test utilities

#![allow(dead_code)]

use std::f32::consts::PI;

/// Generate a mono sine wave with `num_samples` samples
pub fn generate_sine(freq: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect()
}

/// Generate white noise
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    let mut rng = SimpleRng::new(seed);
    (0..num_samples)
        .map(|_| rng.next_f32() * 2.0 - 1.0)
        .collect()
}

/// Simple pseudo-random number generator (xorshift)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f32(&mut self) -> f32 {
        (self.next_u64() as f64 / u64::MAX as f64) as f32
    }
}

/// Encode samples the way analyze-signal reads them (native-endian f32)
pub fn to_raw_bytes(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
}

/// Parse result lines into their numeric fields
pub fn parse_lines(stdout: &str) -> Vec<Vec<f32>> {
    stdout
        .lines()
        .map(|line| {
            line.split(' ')
                .filter(|f| !f.is_empty())
                .map(|f| f.parse().expect("numeric field"))
                .collect()
        })
        .collect()
}
