//! Library entry for pixpack-cli used by integration tests and embedding.

pub mod commands;
pub mod progress;

// Re-export commands for convenience
pub use commands::{decode, encode, list, load_config};
