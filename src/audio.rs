use std::io::{ErrorKind, Read};

const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Outcome of filling one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameRead {
    /// Every sample of the frame was replaced
    Full,
    /// Input ended after this many samples; the rest of the frame is stale
    Partial(usize),
    /// Input ended before the first sample
    EndOfStream,
}

/// Reads mono native-endian `f32` samples from a byte stream, one frame at a
/// time
pub(crate) struct SampleReader<R> {
    inner: R,
    bytes: Vec<u8>,
}

impl<R: Read> SampleReader<R> {
    pub(crate) fn new(inner: R, frame_size: usize) -> Self {
        Self {
            inner,
            bytes: vec![0; frame_size * SAMPLE_BYTES],
        }
    }

    /// Block until `frame` is full or the input ends.
    ///
    /// Only whole samples are copied into `frame`; a dangling partial sample at
    /// the end of input is ignored. Samples past the filled count keep their
    /// previous values.
    pub(crate) fn read_frame(&mut self, frame: &mut [f32]) -> std::io::Result<FrameRead> {
        let wanted = frame.len() * SAMPLE_BYTES;
        if self.bytes.len() < wanted {
            self.bytes.resize(wanted, 0);
        }

        let mut filled = 0;
        while filled < wanted {
            match self.inner.read(&mut self.bytes[filled..wanted]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let samples = filled / SAMPLE_BYTES;
        for (sample, chunk) in frame
            .iter_mut()
            .zip(self.bytes[..samples * SAMPLE_BYTES].chunks_exact(SAMPLE_BYTES))
        {
            *sample = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Ok(if samples == frame.len() {
            FrameRead::Full
        } else if samples == 0 {
            FrameRead::EndOfStream
        } else {
            FrameRead::Partial(samples)
        })
    }
}
