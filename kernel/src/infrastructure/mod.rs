/// Command-line interface.
pub mod cli;
/// Configuration management for the kernel.
pub mod config;
/// Structured run journal.
pub mod journal;
/// Telemetry setup for logging.
pub mod telemetry;
