use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::error::GenerateError;

/// One entry of a template or generated archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub path: String,
    pub is_directory: bool,
    pub bytes: Vec<u8>,
}

impl TemplateEntry {
    pub fn file(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
            bytes: bytes.into(),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with('/') {
            path.push('/');
        }
        Self {
            path,
            is_directory: true,
            bytes: Vec::new(),
        }
    }
}

/// Turns archive bytes into ordered entries and back.
pub trait ArchiveCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<TemplateEntry>, GenerateError>;
    fn encode(&self, entries: &[TemplateEntry]) -> Result<Vec<u8>, GenerateError>;
}

/// Zip container. Output is byte-for-byte reproducible: deflate with a
/// fixed 1980-01-01 timestamp on every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCodec;

impl ZipCodec {
    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
    }
}

impl ArchiveCodec for ZipCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<TemplateEntry>, GenerateError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| GenerateError::Decode(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| GenerateError::Decode(e.to_string()))?;

            let path = file.name().to_string();
            if file.is_dir() {
                entries.push(TemplateEntry::directory(path));
                continue;
            }

            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)
                .map_err(|e| GenerateError::Decode(format!("{}: {}", path, e)))?;
            entries.push(TemplateEntry::file(path, bytes));
        }

        Ok(entries)
    }

    fn encode(&self, entries: &[TemplateEntry]) -> Result<Vec<u8>, GenerateError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = Self::options();

        for entry in entries {
            if entry.is_directory {
                writer
                    .add_directory(entry.path.as_str(), options)
                    .map_err(|e| GenerateError::Encode(e.to_string()))?;
            } else {
                writer
                    .start_file(entry.path.as_str(), options)
                    .map_err(|e| GenerateError::Encode(e.to_string()))?;
                writer
                    .write_all(&entry.bytes)
                    .map_err(|e| GenerateError::Encode(e.to_string()))?;
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| GenerateError::Encode(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}
