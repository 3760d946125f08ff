//! # zipconv Entry Encoding (`common::archive::encode`)
//!
//! File: cli/src/common/archive/encode.rs
//!
//! Compresses one entry's bytes with the method of a `CompressionFormat` and
//! records what the container needs to describe it (method id, flags, CRC-32,
//! sizes). Encoding is complete before anything touches the archive buffer, so a
//! failed entry never leaves partial data behind.
//!
//! LZMA entries use the zip framing: a 2-byte encoder version, a 2-byte
//! properties length (always 5), the 5 properties bytes, then the raw LZMA
//! stream terminated by an end marker. General-purpose flag bit 1 announces the
//! marker to readers.
//!
use super::format::CompressionFormat;
use lzma_rust2::{LzmaOptions, LzmaWriter};
use std::io::{self, Write};

/// General-purpose flag bit 1: the LZMA stream ends with an end-of-stream marker.
const FLAG_LZMA_END_MARKER: u16 = 1 << 1;

/// Version bytes written ahead of the LZMA properties (major, minor).
const LZMA_ENCODER_VERSION: [u8; 2] = [9, 20];

/// Size of the LZMA properties block: one props byte plus a u32 dictionary size.
const LZMA_PROPERTIES_SIZE: u16 = 5;

const LZMA_PRESET: u32 = 6;

/// Smallest dictionary the LZMA encoder accepts.
const LZMA_MIN_DICT_SIZE: u32 = 4096;

/// A compressed entry, ready to be appended to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEntry {
    pub method: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub crc32: u32,
    pub uncompressed_size: u64,
    pub data: Vec<u8>,
}

/// # Encode Entry (`encode`)
///
/// Compresses `content` with `format`'s method.
///
/// ## Errors
///
/// Returns the compressor's I/O error if the encoder fails.
pub fn encode(format: CompressionFormat, content: &[u8]) -> io::Result<EncodedEntry> {
    let data = match format {
        CompressionFormat::Stored => content.to_vec(),
        CompressionFormat::Deflate => {
            let mut encoder = flate2::write::DeflateEncoder::new(
                Vec::with_capacity(content.len() / 2),
                flate2::Compression::default(),
            );
            encoder.write_all(content)?;
            encoder.finish()?
        }
        CompressionFormat::Bzip2 => {
            let mut encoder = bzip2::write::BzEncoder::new(
                Vec::with_capacity(content.len() / 2),
                bzip2::Compression::default(),
            );
            encoder.write_all(content)?;
            encoder.finish()?
        }
        CompressionFormat::Lzma => encode_lzma(content)?,
    };

    let flags = match format {
        CompressionFormat::Lzma => FLAG_LZMA_END_MARKER,
        _ => 0,
    };

    Ok(EncodedEntry {
        method: format.method(),
        version_needed: format.version_needed(),
        flags,
        crc32: crc32fast::hash(content),
        uncompressed_size: content.len() as u64,
        data,
    })
}

fn encode_lzma(content: &[u8]) -> io::Result<Vec<u8>> {
    let mut options = LzmaOptions::with_preset(LZMA_PRESET);
    // No point reserving a dictionary larger than the input.
    let wanted = u32::try_from(content.len()).unwrap_or(u32::MAX);
    options.dict_size = options.dict_size.min(wanted.max(LZMA_MIN_DICT_SIZE));

    let mut framed = Vec::with_capacity(content.len() / 2 + 16);
    framed.extend_from_slice(&LZMA_ENCODER_VERSION);
    framed.extend_from_slice(&LZMA_PROPERTIES_SIZE.to_le_bytes());
    framed.push(options.get_props());
    framed.extend_from_slice(&options.dict_size.to_le_bytes());

    let mut writer = LzmaWriter::new_no_header(framed, &options, true)?;
    writer.write_all(content)?;
    writer.finish()
}
