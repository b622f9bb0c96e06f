/// Configuration subsystem - session settings and preferences
///
/// This module handles loading configuration from .snapeditrc files.

pub mod rc;

// Re-export public interface
pub use rc::{ConfigError, RcConfig, RcLoader};
