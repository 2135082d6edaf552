//! Suite-level hooks: one shared guard per test process
//!
//! Test runners invoke these around the whole suite: [`before_first_test`]
//! ahead of the first test, [`after_last_test`] once everything has run,
//! pass or fail. The guard behind them is process-wide; a suite gets at most
//! one server out of it.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::warn;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::server::ServerGuard;

static SUITE_GUARD: Lazy<Mutex<Option<ServerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Install and start the shared suite guard.
///
/// The runner is expected to call this exactly once per suite; a repeated
/// call while a guard is installed is tolerated as a no-op.
pub fn before_first_test(config: ServerConfig) -> Result<()> {
    let mut slot = SUITE_GUARD.lock();
    if slot.is_some() {
        warn!("suite guard already installed, ignoring repeated start");
        return Ok(());
    }

    let mut guard = ServerGuard::new(config);
    guard.start()?;
    *slot = Some(guard);
    Ok(())
}

/// Stop and discard the shared suite guard, if one is installed.
pub fn after_last_test() {
    if let Some(mut guard) = SUITE_GUARD.lock().take() {
        guard.stop();
    }
}
