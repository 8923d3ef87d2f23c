//! Console binding
//!
//! Attaches the process log sink to the standard streams so diagnostics from
//! the window engine are visible. Failure is reported, never propagated.

use std::sync::atomic::{AtomicBool, Ordering};

static ATTACHED: AtomicBool = AtomicBool::new(false);

/// Install the env_logger sink (filter from `RUST_LOG`, default `info`).
/// Returns `false` if another logger already owns the process.
pub fn attach() -> bool {
    if ATTACHED.load(Ordering::Acquire) {
        return true;
    }
    let installed = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .try_init()
        .is_ok();
    if installed {
        ATTACHED.store(true, Ordering::Release);
        log::debug!("console attached");
    }
    installed
}

/// Whether [`attach`] has installed the sink in this process
pub fn is_attached() -> bool {
    ATTACHED.load(Ordering::Acquire)
}
