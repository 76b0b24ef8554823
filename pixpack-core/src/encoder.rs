//! Container encoding

use crate::error::PackError;
use crate::types::Record;
use bytes::{BufMut, Bytes, BytesMut};

#[cfg(feature = "logging")]
use tracing::debug;

/// Append one record to a buffer
///
/// The record is encoded with the following layout:
/// 1. Name length (1 byte)
/// 2. Name (name length bytes)
/// 3. Data length (4 bytes, big-endian)
/// 4. Data (data length bytes)
///
/// Nothing is written if the record fails validation.
pub fn encode_record(buf: &mut BytesMut, record: &Record) -> Result<(), PackError> {
    record.validate()?;

    buf.reserve(record.encoded_len());
    buf.put_u8(record.name.len() as u8);
    buf.put_slice(&record.name);
    buf.put_u32(record.data.len() as u32);
    buf.put_slice(&record.data);

    Ok(())
}

/// Encode a list of records into one container.
///
/// Fails on the first record that does not fit the format; use
/// [`ContainerBuilder`] to skip such records instead.
pub fn encode_container(records: &[Record]) -> Result<Bytes, PackError> {
    let mut builder = ContainerBuilder::with_capacity(container_len(records));
    for record in records {
        builder.push(record)?;
    }
    Ok(builder.finish())
}

/// Total container length for a list of records
pub fn container_len(records: &[Record]) -> usize {
    records.iter().map(Record::encoded_len).sum()
}

/// Accumulates records into a container, one encode call at a time
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    buf: BytesMut,
    records: usize,
}

impl ContainerBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            records: 0,
        }
    }

    /// Frame a record and append it.
    ///
    /// A rejected record leaves the container untouched.
    pub fn push(&mut self, record: &Record) -> Result<(), PackError> {
        encode_record(&mut self.buf, record)?;
        self.records += 1;

        #[cfg(feature = "logging")]
        debug!(
            "Framed record {} ({} bytes, container now {} bytes)",
            String::from_utf8_lossy(&record.name),
            record.data.len(),
            self.buf.len()
        );

        Ok(())
    }

    /// Number of records framed so far
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Container length so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no record has been framed
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Finish and return the container bytes
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
