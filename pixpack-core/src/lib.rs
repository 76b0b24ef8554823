//! # Pixpack Core
//!
//! Packs a set of files, including whole directory trees, into the pixels of
//! a single lossless PNG, and recovers them byte for byte.
//!
//! ## Modules
//!
//! - `constants`: Container format constants and limits
//! - `types`: Core types (Record)
//! - `encoder`: Container encoding
//! - `decoder`: Strict container decoding and name sanitizing
//! - `pixels`: Byte stream to square RGB grid and back
//! - `raster`: PNG persistence
//! - `walker`: Input enumeration
//! - `extract`: All-or-nothing extraction of one image
//! - `batch`: Encode/decode batches with per-input reporting
//! - `config`: Batch options
//!
//! ## Container layout
//!
//! ```text
//! record    := nameLen(u8) name dataLen(u32 BE) data
//! container := record* [0]
//! ```
//!
//! The container is laid row-major over a square grid, three bytes per pixel,
//! and zero padding after the last record doubles as the end-of-data marker.

#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod pixels;
pub mod raster;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use batch::{decode, encode, DecodeReport, EncodeReport, NoProgress, ProgressObserver};
pub use config::PackConfig;
pub use error::{ErrorKind, PackError};
pub use types::Record;

/// Result type alias for pixpack operations
pub type Result<T> = core::result::Result<T, PackError>;
