//! Container decoding (strict mode)

use crate::constants::{DATA_LEN_SIZE, END_OF_DATA, NAME_SEPARATOR};
use crate::error::PackError;
use crate::types::Record;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

#[cfg(feature = "logging")]
use tracing::debug;

/// Position of a [`RecordReader`] in the record grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeState {
    /// Next byte is a name length (or the end-of-data marker)
    ExpectingNameLength,
    /// Reading a name of the given length
    ReadingName(usize),
    /// Name read; next 4 bytes are the data length
    ExpectingDataLength(Bytes),
    /// Reading the data of a named record
    ReadingData {
        /// Name of the record being read.
        name: Bytes,
        /// Data length announced by the header.
        len: usize,
    },
    /// End of data reached cleanly
    Done,
    /// A field ran past the end of the stream
    Failed,
}

/// Iterates over the records of a container byte stream.
///
/// Payload and name slices share the input buffer, nothing is copied.
/// Once the reader is `Done` or `Failed` it yields nothing more.
#[derive(Debug, Clone)]
pub struct RecordReader {
    data: Bytes,
    pos: usize,
    state: DecodeState,
}

impl RecordReader {
    /// Start reading at the beginning of `data`
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            state: DecodeState::ExpectingNameLength,
        }
    }

    /// Current state
    pub fn state(&self) -> &DecodeState {
        &self.state
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` at the end-of-data marker, at the end of the stream
    /// between records, and on every call after a failure.
    pub fn next_record(&mut self) -> Result<Option<Record>, PackError> {
        loop {
            // Failed is the placeholder: an early return via `?` leaves it in place
            match std::mem::replace(&mut self.state, DecodeState::Failed) {
                DecodeState::ExpectingNameLength => {
                    let Some(&name_len) = self.data.get(self.pos) else {
                        self.state = DecodeState::Done;
                        return Ok(None);
                    };
                    self.pos += 1;

                    if name_len == END_OF_DATA {
                        #[cfg(feature = "logging")]
                        debug!("End-of-data marker at offset {}", self.pos - 1);

                        self.state = DecodeState::Done;
                        return Ok(None);
                    }
                    self.state = DecodeState::ReadingName(name_len as usize);
                }
                DecodeState::ReadingName(len) => {
                    let name = self.take("name", len)?;
                    self.state = DecodeState::ExpectingDataLength(name);
                }
                DecodeState::ExpectingDataLength(name) => {
                    let raw = self.take("data length", DATA_LEN_SIZE)?;
                    let len = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize;
                    self.state = DecodeState::ReadingData { name, len };
                }
                DecodeState::ReadingData { name, len } => {
                    let data = self.take("data", len)?;
                    self.state = DecodeState::ExpectingNameLength;
                    return Ok(Some(Record { name, data }));
                }
                DecodeState::Done => {
                    self.state = DecodeState::Done;
                    return Ok(None);
                }
                DecodeState::Failed => return Ok(None),
            }
        }
    }

    fn take(&mut self, field: &'static str, len: usize) -> Result<Bytes, PackError> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(PackError::Truncated {
                field,
                offset: self.pos,
                expected: len,
                available,
            });
        }

        let slice = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(slice)
    }
}

impl Iterator for RecordReader {
    type Item = Result<Record, PackError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Decode every record of a container.
///
/// This function performs strict validation:
/// - every field must fit inside the stream
/// - every name must be a safe relative path (see [`record_path`])
/// - the container must hold at least one record
pub fn decode_container(data: impl Into<Bytes>) -> Result<Vec<Record>, PackError> {
    let mut records = Vec::new();

    for record in RecordReader::new(data) {
        let record = record?;
        record_path(&record.name)?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(PackError::EmptyContainer);
    }

    Ok(records)
}

/// Turn a stored name into a relative path that cannot leave its root.
///
/// Names are `/`-separated. Empty, `.` and `..` components, absolute
/// names, backslashes, NUL bytes and platform prefixes are rejected.
pub fn record_path(name: &[u8]) -> Result<PathBuf, PackError> {
    let name = std::str::from_utf8(name)
        .map_err(|_| PackError::NonUtf8Name(String::from_utf8_lossy(name).into_owned()))?;
    let unsafe_name = || PackError::UnsafeName(name.to_string());

    if name.contains(|c: char| c == '\\' || c == '\0') {
        return Err(unsafe_name());
    }

    let mut path = PathBuf::new();
    for part in name.split(NAME_SEPARATOR) {
        if part.is_empty() || part == "." || part == ".." {
            return Err(unsafe_name());
        }

        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => path.push(part),
            _ => return Err(unsafe_name()),
        }
    }

    Ok(path)
}
