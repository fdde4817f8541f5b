//! Version-control backends for the generator's engine port.

pub mod git;

pub use git::GitCli;
