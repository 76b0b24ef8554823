//! Error types for pixpack operations

use std::path::PathBuf;

/// Broad classes of failure, used by callers to decide how to report an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source file could not be read while encoding
    Read,
    /// A file does not fit the container's length fields
    EncodingConstraint,
    /// The output image could not be produced
    Write,
    /// An image's byte stream does not parse into safe records
    DecodeStructural,
    /// A file is not a decodable raster image
    ImageRead,
}

/// Errors that can occur while packing or unpacking files
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PackError {
    /// Source file could not be read
    #[error("Failed to read {path}: {reason}")]
    Read {
        /// The offending input path.
        path: PathBuf,
        /// Underlying I/O error.
        reason: String,
    },

    /// Stored name does not fit the 1-byte length field
    #[error("Name {name:?} is {len} bytes, maximum is {max}")]
    NameTooLong {
        /// The name that was rejected.
        name: String,
        /// Its length in bytes.
        len: usize,
        /// The largest length the format allows.
        max: usize,
    },

    /// File contents do not fit the 4-byte length field
    #[error("File size {0} exceeds maximum {1}")]
    DataTooLarge(u64, u64),

    /// A name that cannot be stored (empty, or not valid UTF-8)
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Nothing could be framed, so no image was written
    #[error("No input files could be read")]
    NoInputs,

    /// Output image could not be written
    #[error("Failed to write image {path}: {reason}")]
    Write {
        /// Output image path.
        path: PathBuf,
        /// Underlying encoder or I/O error.
        reason: String,
    },

    /// Input is not a decodable image
    #[error("Failed to read image {path}: {reason}")]
    ImageRead {
        /// Input image path.
        path: PathBuf,
        /// Underlying decoder or I/O error.
        reason: String,
    },

    /// Pixel grid dimensions are unusable
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// A field runs past the end of the byte stream
    #[error("Truncated {field} at offset {offset}: need {expected} bytes, {available} available")]
    Truncated {
        /// Which part of the record was being read.
        field: &'static str,
        /// Stream offset where the field starts.
        offset: usize,
        /// Bytes the field needs.
        expected: usize,
        /// Bytes left in the stream.
        available: usize,
    },

    /// Decoded name is not valid UTF-8
    #[error("Record name {0:?} is not valid UTF-8")]
    NonUtf8Name(String),

    /// Decoded name would resolve outside the output directory
    #[error("Unsafe record name: {0:?}")]
    UnsafeName(String),

    /// Image holds no records at all
    #[error("Container holds no records")]
    EmptyContainer,

    /// Writing an extracted file failed; the image's files were rolled back
    #[error("Failed to extract {path}: {reason}")]
    Extract {
        /// File being written when the failure happened.
        path: PathBuf,
        /// Underlying I/O error.
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error during read/write
    #[error("IO error: {0}")]
    Io(String),
}

impl PackError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackError::Read { .. } | PackError::Io(_) => ErrorKind::Read,
            PackError::NameTooLong { .. }
            | PackError::DataTooLarge(..)
            | PackError::InvalidName(_) => ErrorKind::EncodingConstraint,
            PackError::NoInputs
            | PackError::Write { .. }
            | PackError::InvalidRaster(_)
            | PackError::Config(_) => ErrorKind::Write,
            PackError::Truncated { .. }
            | PackError::NonUtf8Name(_)
            | PackError::UnsafeName(_)
            | PackError::EmptyContainer
            | PackError::Extract { .. } => ErrorKind::DecodeStructural,
            PackError::ImageRead { .. } => ErrorKind::ImageRead,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, err: impl ToString) -> Self {
        PackError::Read {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PackError {
    fn from(err: std::io::Error) -> Self {
        PackError::Io(err.to_string())
    }
}
