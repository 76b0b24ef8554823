//! Constants and limits for the pixpack container format

/// Size of the name length field (1 byte, unsigned)
pub const NAME_LEN_SIZE: usize = 1;

/// Size of the data length field (4 bytes, big-endian)
pub const DATA_LEN_SIZE: usize = 4;

/// Fixed bytes every record carries besides its name and data
pub const RECORD_OVERHEAD: usize = NAME_LEN_SIZE + DATA_LEN_SIZE;

/// Longest stored name, in bytes, the 1-byte length field can describe
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Largest file, in bytes, the 4-byte length field can describe
pub const MAX_DATA_LEN: u64 = u32::MAX as u64;

/// Name length value that marks the logical end of a container.
///
/// Encoders never emit an empty name, so a zero here can only be the
/// zero padding that follows the last record.
pub const END_OF_DATA: u8 = 0;

/// Bytes carried by a single pixel (R, G, B)
pub const CHANNEL_COUNT: usize = 3;

/// Separator between path components inside a stored name
pub const NAME_SEPARATOR: char = '/';

/// Extension of the images produced by the encoder
pub const IMAGE_EXTENSION: &str = "png";
