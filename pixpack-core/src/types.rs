//! Core types for pixpack containers

use crate::constants::{MAX_DATA_LEN, MAX_NAME_LEN, RECORD_OVERHEAD};
use crate::error::PackError;
use bytes::Bytes;

/// One file framed inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Stored name: a base name, or a `/`-separated relative path
    pub name: Bytes,

    /// File contents
    pub data: Bytes,
}

impl Record {
    /// Create a new record
    pub fn new(name: impl Into<Bytes>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Check that the record fits the container's length fields.
    ///
    /// Names must be 1..=255 bytes; an empty name would read back as the
    /// end-of-data marker.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.name.is_empty() {
            return Err(PackError::InvalidName("empty name".into()));
        }

        if self.name.len() > MAX_NAME_LEN {
            return Err(PackError::NameTooLong {
                name: String::from_utf8_lossy(&self.name).into_owned(),
                len: self.name.len(),
                max: MAX_NAME_LEN,
            });
        }

        if self.data.len() as u64 > MAX_DATA_LEN {
            return Err(PackError::DataTooLarge(self.data.len() as u64, MAX_DATA_LEN));
        }

        Ok(())
    }

    /// Number of container bytes this record occupies
    pub fn encoded_len(&self) -> usize {
        RECORD_OVERHEAD + self.name.len() + self.data.len()
    }

    /// Name as a string slice
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }
}
