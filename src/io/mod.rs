/// Command-line front end
pub mod cli;
/// Engine constants and runtime configuration
pub mod configuration;
/// Error types and localization keys
pub mod error;
/// Decoding and encoding at the codec boundary
pub mod image;
/// Log subscriber setup
pub mod logging;
/// Phase-scoped progress reporting
pub mod progress;
/// Deferred tile sources
pub mod storage;
