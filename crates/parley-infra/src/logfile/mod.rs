//! Log file sink: truncation on startup and tail reads for diagnostics.

pub mod tail;

pub use tail::LogFile;
