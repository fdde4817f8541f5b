//! Grove Kernel - process shell for the history generator.
//!
//! This crate provides everything around the generator core: layered
//! configuration, the command-line interface, telemetry and the run journal,
//! the git CLI backend and the lorem ipsum text source.

/// Infrastructure components (cli, config, journal, telemetry).
pub mod infrastructure;
/// Generation run wiring.
pub mod runner;
/// Text sources.
pub mod text;
/// Version-control backends.
pub mod vcs;
