//! Process-wide tracing/logging setup.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (format, filters).
pub mod tracing;
