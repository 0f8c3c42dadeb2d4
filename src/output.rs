use std::io::Write;

use colored::*;

use crate::analysis::Peak;
use crate::config::OutputField;

pub(crate) fn print_error(msg: &str) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub(crate) fn print_warning(msg: &str) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

/// Values computed for one frame; each is `None` when no configured field
/// asked for it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FrameResult {
    pub(crate) peak: Option<Peak>,
    pub(crate) rms: Option<f32>,
}

impl FrameResult {
    fn value(&self, field: OutputField) -> Option<f32> {
        match field {
            OutputField::Frequency => self.peak.map(|p| p.frequency),
            OutputField::Amplitude => self.peak.map(|p| p.power),
            OutputField::Rms => self.rms,
        }
    }
}

/// Write one result line: the fields in order, space separated, newline
/// terminated
pub(crate) fn write_result_line<W: Write>(
    out: &mut W,
    fields: &[OutputField],
    result: &FrameResult,
) -> std::io::Result<()> {
    for (i, &field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        // Missing values only happen if the pipeline skipped a stage a field needs
        write!(out, "{}", result.value(field).unwrap_or(f32::NAN))?;
    }
    out.write_all(b"\n")?;
    out.flush()
}
