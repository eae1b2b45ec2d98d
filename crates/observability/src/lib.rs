//! Process-wide tracing setup shared by the binaries.

/// Initialize tracing for the process in the given output format.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

pub mod tracing;

pub use tracing::{LogFormat, UnknownLogFormat};
