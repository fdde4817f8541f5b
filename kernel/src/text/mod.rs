//! Text sources for file bodies, edited lines and generated names.

pub mod lorem;

pub use lorem::LoremSampler;
