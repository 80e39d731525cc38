//! ## Logging Configuration
//!
//! This module sets up logging automatically at program startup using the `ctor` crate.
//! Logging behavior is controlled by the `DEBUG_TAXI_DASHBOARD` environment variable:
//!
//! - **Disabled** (default): If the variable is unset, empty, or explicitly set to `"0"` or `"false"`,
//!   no logging will be initialized.
//! - **Enabled**: Any other value enables logging with a maximum log level of `DEBUG`.
//!
//! The server binary calls [`init_default_logging`] so that startup and request logs are
//! visible at `INFO` level even when debug logging is off.
//!
//! ### Usage Example
//!
//! ```sh
//! export DEBUG_TAXI_DASHBOARD=true
//! ```

use ctor::ctor;
use tracing::Level;

const DEBUG_ENV_VAR: &str = "DEBUG_TAXI_DASHBOARD";

fn debug_logging_enabled() -> bool {
    !std::env::var(DEBUG_ENV_VAR).map_or(true, |v| v == "0" || v == "false" || v.is_empty())
}

#[ctor]
fn set_debug_level() {
    if debug_logging_enabled() {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();
    }
}

/// Installs an `INFO` level subscriber unless the debug subscriber is already active.
pub fn init_default_logging() {
    // No-op when the debug subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_can_be_installed_twice() {
        init_default_logging();
        init_default_logging();
        tracing::info!("logging still works");
    }
}
