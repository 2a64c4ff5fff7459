//! Stop-between-files support
//!
//! First SIGINT/SIGTERM sets a flag the runner checks before opening the next
//! file; the file in flight still commits or rolls back cleanly. A second
//! signal exits immediately with status 130.

use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status used when a run is interrupted
pub const INTERRUPTED_EXIT: u8 = 130;

fn shutdown_flag() -> &'static AtomicBool {
    static FLAG: AtomicBool = AtomicBool::new(false);
    &FLAG
}

pub fn is_shutdown_requested() -> bool {
    shutdown_flag().load(Ordering::Relaxed)
}

/// Set the flag; returns whether it was already set.
pub fn request_shutdown() -> bool {
    shutdown_flag().swap(true, Ordering::Relaxed)
}

/// Register SIGINT and SIGTERM handlers that call [`request_shutdown`].
pub fn install_signal_handlers() -> std::io::Result<()> {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        // SAFETY: the handler only swaps an AtomicBool and calls `_exit`,
        // both async-signal-safe.
        unsafe {
            signal_hook::low_level::register(signal, || {
                if request_shutdown() {
                    signal_hook::low_level::exit(i32::from(INTERRUPTED_EXIT));
                }
            })?;
        }
    }
    Ok(())
}
