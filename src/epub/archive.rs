//! OCF archive writing and validation.
//!
//! The `mimetype` entry is written first, stored without compression, as OCF requires; every
//! later entry is deflated. Entries appear in the archive in the order they are added, and all of
//! them carry the same fixed modification time so that identical inputs give identical bytes.
//!
//! Finished archives are checked before they are handed back: a buffer that does not open with
//! a stored `mimetype` entry is never returned to the caller.

use super::error::{BuildError, Result};
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// MIME type of an EPUB package, stored verbatim as the first archive entry.
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// Zip local file header signature, `PK\x03\x04`.
pub const LOCAL_FILE_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Anything shorter than this cannot hold the mandatory entries of a package.
pub const MIN_PACKAGE_LEN: usize = 256;

/// Size of the fixed part of a zip local file header.
const LOCAL_HEADER_LEN: usize = 30;

/// Writes the entries of an OCF container, in order, to an in-memory buffer.
pub struct OcfWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: Vec<String>,
}

impl OcfWriter {
    /// Create an archive with its `mimetype` entry already written.
    pub fn new() -> Result<Self> {
        let mut writer = Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entries: Vec::new(),
        };
        writer.write_entry("mimetype", EPUB_MIMETYPE.as_bytes(), CompressionMethod::Stored)?;
        Ok(writer)
    }

    /// Add a deflated file at `path` (relative to the archive root).
    pub fn add<P: AsRef<str>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        self.write_entry(path.as_ref(), content, CompressionMethod::Deflated)
    }

    fn write_entry(&mut self, path: &str, content: &[u8], method: CompressionMethod) -> Result<()> {
        log::debug!("adding {path} ({} bytes, {method:?})", content.len());
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(zip::DateTime::default());

        let archive_error = |reason: String| BuildError::Archive {
            path: path.to_string(),
            reason,
        };
        self.zip
            .start_file(path, options)
            .map_err(|e| archive_error(e.to_string()))?;
        self.zip
            .write_all(content)
            .map_err(|e| archive_error(e.to_string()))?;

        self.entries.push(path.to_string());
        Ok(())
    }

    /// Paths written so far, in archive order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Finish the archive and return its validated bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let bytes = self
            .zip
            .finish()
            .map_err(|e| BuildError::Serialization(e.to_string()))?
            .into_inner();
        validate(&bytes)?;
        Ok(bytes)
    }
}

/// Check that `bytes` plausibly holds an OCF container: a zip archive of reasonable size whose
/// first entry is a stored `mimetype` with exactly [`EPUB_MIMETYPE`] as its contents.
pub fn validate(bytes: &[u8]) -> Result<()> {
    if bytes.len() < MIN_PACKAGE_LEN {
        return Err(BuildError::Serialization(format!(
            "archive is only {} bytes long",
            bytes.len()
        )));
    }
    if bytes[..4] != LOCAL_FILE_HEADER {
        return Err(BuildError::Serialization(
            "archive does not start with a zip local file header".to_string(),
        ));
    }

    let method = read_u16(bytes, 8);
    let name_len = read_u16(bytes, 26) as usize;
    let extra_len = read_u16(bytes, 28) as usize;
    let name_end = LOCAL_HEADER_LEN + name_len;
    let data_start = name_end + extra_len;
    let data_end = data_start + EPUB_MIMETYPE.len();

    if bytes.len() < data_end || &bytes[LOCAL_HEADER_LEN..name_end] != b"mimetype" {
        return Err(BuildError::Serialization(
            "first archive entry is not `mimetype`".to_string(),
        ));
    }
    if method != 0 {
        return Err(BuildError::Serialization(format!(
            "`mimetype` entry is compressed (method {method})"
        )));
    }
    if &bytes[data_start..data_end] != EPUB_MIMETYPE.as_bytes() {
        return Err(BuildError::Serialization(
            "`mimetype` entry has unexpected contents".to_string(),
        ));
    }

    Ok(())
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
