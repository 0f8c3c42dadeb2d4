//! Termination signals mapped onto the pipeline's stop flag

use std::sync::Arc;

use log::debug;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::flag;

use crate::error::{Error, Result};
use crate::pipeline::StopFlag;

#[cfg(unix)]
const STOP_SIGNALS: &[i32] = &[SIGINT, signal_hook::consts::signal::SIGHUP, SIGTERM];
#[cfg(not(unix))]
const STOP_SIGNALS: &[i32] = &[SIGINT, SIGTERM];

/// Exit status used when a second signal arrives before the loop has stopped
const FORCED_EXIT_STATUS: i32 = 1;

/// Route SIGINT, SIGHUP and SIGTERM to `stop`.
///
/// The first signal only sets the flag. A repeated signal while the flag is
/// already set exits the process, for streams that never deliver another
/// frame.
pub(crate) fn register_stop_signals(stop: &StopFlag) -> Result<()> {
    for &sig in STOP_SIGNALS {
        // Conditional shutdown must be registered first so it sees the flag
        // before this same signal sets it
        flag::register_conditional_shutdown(
            sig,
            FORCED_EXIT_STATUS,
            Arc::clone(stop.as_atomic()),
        )
        .map_err(Error::Signal)?;
        flag::register(sig, Arc::clone(stop.as_atomic())).map_err(Error::Signal)?;
    }
    debug!("stop signals registered: {:?}", STOP_SIGNALS);
    Ok(())
}
