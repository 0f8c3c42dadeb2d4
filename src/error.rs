/// Invalid option combination or value, detected before any input is read
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--amplitude cannot be used without --frequency")]
    AmplitudeWithoutFrequency,

    #[error(
        "FFT size must be a power of two from 2 to {max} (got {0})",
        max = crate::config::MAX_FFT_SIZE
    )]
    FftSize(usize),

    #[error("sample rate must be positive (got {0})")]
    SampleRate(u32),
}

/// Crate-level error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading samples or writing result lines failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Io(_) | Error::Signal(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
