//! # zipconv Zip Container (`common::archive::container`)
//!
//! File: cli/src/common/archive/container.rs
//!
//! ## Overview
//!
//! Lays out already-encoded entries as a zip file in a growing `Vec<u8>`:
//!
//! ```text
//! [local header + name + data]*  [central directory record]*  end record
//! ```
//!
//! Entries are appended in call order and names are written as given, so two
//! entries may share a name. Sizes and CRCs are known up front, which keeps the
//! local headers complete (no data descriptors). Offsets and sizes are 32-bit;
//! anything that would need zip64 is refused before a single byte is written.
//!
use super::compressor::CompressorError;
use super::encode::EncodedEntry;

const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;

/// Host system unix (high byte), zip specification 6.3 (low byte).
const VERSION_MADE_BY: u16 = (3 << 8) | 63;

/// General-purpose flag bit 11: the entry name is UTF-8.
const FLAG_UTF8_NAME: u16 = 1 << 11;

/// MS-DOS timestamp of 1980-01-01 00:00, the earliest representable.
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = (1 << 5) | 1;

/// Regular file, mode 0644, in the unix half of the external attributes.
const EXTERNAL_ATTRIBUTES: u32 = 0o100644 << 16;

const LOCAL_HEADER_LEN: usize = 30;
const CENTRAL_RECORD_LEN: usize = 46;

struct CentralRecord {
    name: String,
    method: u16,
    version_needed: u16,
    flags: u16,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    local_header_offset: u32,
}

/// In-memory zip layout for a sequence of encoded entries.
#[derive(Default)]
pub struct ZipContainer {
    buffer: Vec<u8>,
    records: Vec<CentralRecord>,
}

impl ZipContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries appended so far.
    pub fn entry_count(&self) -> usize {
        self.records.len()
    }

    /// # Append Entry (`append`)
    ///
    /// Writes the local header, name and data of one entry.
    ///
    /// ## Errors
    ///
    /// `LimitExceeded` if the name, the sizes, the offset or the entry count do not
    /// fit the classic zip fields. The container is left untouched in that case.
    pub fn append(&mut self, name: &str, entry: EncodedEntry) -> Result<(), CompressorError> {
        let name_len = u16::try_from(name.len())
            .map_err(|_| CompressorError::LimitExceeded("entry name longer than 65535 bytes"))?;
        let compressed_size = u32::try_from(entry.data.len())
            .map_err(|_| CompressorError::LimitExceeded("compressed entry larger than 4 GiB"))?;
        let uncompressed_size = u32::try_from(entry.uncompressed_size)
            .map_err(|_| CompressorError::LimitExceeded("entry larger than 4 GiB"))?;
        let local_header_offset = u32::try_from(self.buffer.len())
            .map_err(|_| CompressorError::LimitExceeded("archive larger than 4 GiB"))?;
        if self.records.len() >= usize::from(u16::MAX) {
            return Err(CompressorError::LimitExceeded("more than 65535 entries"));
        }

        let record = CentralRecord {
            name: name.to_string(),
            method: entry.method,
            version_needed: entry.version_needed,
            flags: entry.flags | FLAG_UTF8_NAME,
            crc32: entry.crc32,
            compressed_size,
            uncompressed_size,
            local_header_offset,
        };

        let buf = &mut self.buffer;
        buf.reserve(LOCAL_HEADER_LEN + name.len() + entry.data.len());
        put_u32(buf, LOCAL_FILE_HEADER_SIGNATURE);
        put_u16(buf, record.version_needed);
        put_u16(buf, record.flags);
        put_u16(buf, record.method);
        put_u16(buf, DOS_TIME);
        put_u16(buf, DOS_DATE);
        put_u32(buf, record.crc32);
        put_u32(buf, record.compressed_size);
        put_u32(buf, record.uncompressed_size);
        put_u16(buf, name_len);
        put_u16(buf, 0); // extra field length
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(&entry.data);

        self.records.push(record);
        Ok(())
    }

    /// # Finish (`finish`)
    ///
    /// Writes the central directory and the end record, returning the zip bytes.
    ///
    /// ## Errors
    ///
    /// `LimitExceeded` if the central directory would start or end past 4 GiB.
    pub fn finish(self) -> Result<Vec<u8>, CompressorError> {
        let Self {
            mut buffer,
            records,
        } = self;

        let directory_offset = u32::try_from(buffer.len())
            .map_err(|_| CompressorError::LimitExceeded("archive larger than 4 GiB"))?;
        // Bounded by `append`.
        let entry_count = records.len() as u16;

        let directory_len: usize = records
            .iter()
            .map(|record| CENTRAL_RECORD_LEN + record.name.len())
            .sum();
        let directory_size = u32::try_from(directory_len)
            .map_err(|_| CompressorError::LimitExceeded("central directory larger than 4 GiB"))?;
        buffer.reserve(directory_len + 22);

        for record in &records {
            put_u32(&mut buffer, CENTRAL_DIRECTORY_SIGNATURE);
            put_u16(&mut buffer, VERSION_MADE_BY);
            put_u16(&mut buffer, record.version_needed);
            put_u16(&mut buffer, record.flags);
            put_u16(&mut buffer, record.method);
            put_u16(&mut buffer, DOS_TIME);
            put_u16(&mut buffer, DOS_DATE);
            put_u32(&mut buffer, record.crc32);
            put_u32(&mut buffer, record.compressed_size);
            put_u32(&mut buffer, record.uncompressed_size);
            put_u16(&mut buffer, record.name.len() as u16);
            put_u16(&mut buffer, 0); // extra field length
            put_u16(&mut buffer, 0); // comment length
            put_u16(&mut buffer, 0); // disk number start
            put_u16(&mut buffer, 0); // internal attributes
            put_u32(&mut buffer, EXTERNAL_ATTRIBUTES);
            put_u32(&mut buffer, record.local_header_offset);
            buffer.extend_from_slice(record.name.as_bytes());
        }

        put_u32(&mut buffer, END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        put_u16(&mut buffer, 0); // this disk
        put_u16(&mut buffer, 0); // disk holding the directory
        put_u16(&mut buffer, entry_count);
        put_u16(&mut buffer, entry_count);
        put_u32(&mut buffer, directory_size);
        put_u32(&mut buffer, directory_offset);
        put_u16(&mut buffer, 0); // comment length

        Ok(buffer)
    }
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}
