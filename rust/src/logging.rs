//! Logging macros for the engine with verbosity level control.
//!
//! The verbosity comes from the caller's `EngineConfig`, so nothing is
//! emitted at level 0 regardless of the installed `tracing` subscriber.
//! - 0: SILENT
//! - 1: CHANGES (graph built, totals computed, records dropped)
//! - 2: CHECKS (per-pass summaries, demand peaks)
//! - 3: DEBUG (per-task intervals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1), as `tracing::info!`.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2), as `tracing::debug!`.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3), as `tracing::trace!`.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_at_every_level() {
        for verbosity in VERBOSITY_SILENT..=VERBOSITY_DEBUG {
            log_changes!(verbosity, "changes {}", 1);
            log_checks!(verbosity, "checks {}", 2);
            log_debug!(verbosity, task = "a", "debug {}", 3);
        }
    }
}
