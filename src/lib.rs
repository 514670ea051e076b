pub mod cli;
pub mod config;
pub mod error;
pub mod preview;
pub mod watch;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{PreviewConfig, Verbosity, WatchConfig};
pub use error::{PreviewError, WatchSetupError};
pub use preview::PreviewOutcome;
pub use watch::{ChangeNotification, OpMask, WatchHandle};
