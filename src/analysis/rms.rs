/// Root-mean-square of a raw frame. An empty frame has an RMS of 0.
pub(crate) fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frame.iter().map(|&s| s as f64 * s as f64).sum();
    (sum_sq / frame.len() as f64).sqrt() as f32
}
