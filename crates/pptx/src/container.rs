//! ZIP container access.

use s3doc_core::{Error, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// A file member of the container, addressed by its slash-delimited path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    /// Path of the member inside the archive, e.g. `ppt/slides/slide1.xml`.
    pub logical_path: String,
    index: usize,
}

impl ContainerEntry {
    #[cfg(test)]
    pub(crate) fn for_test(logical_path: &str, index: usize) -> Self {
        Self {
            logical_path: logical_path.to_string(),
            index,
        }
    }
}

/// A ZIP archive opened over an in-memory buffer.
///
/// Entries are listed up front in central-directory order; their contents
/// are only decompressed when read.
pub struct Container<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    entries: Vec<ContainerEntry>,
}

impl<'a> Container<'a> {
    /// Open a ZIP container and enumerate its file entries.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ContainerFormat(format!("Failed to open ZIP: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive
                .by_index_raw(index)
                .map_err(|e| Error::ContainerFormat(format!("Failed to read entry #{}: {}", index, e)))?;
            if file.is_dir() {
                continue;
            }
            entries.push(ContainerEntry {
                logical_path: file.name().to_string(),
                index,
            });
        }

        Ok(Self { archive, entries })
    }

    /// File entries in archive order.
    pub fn entries(&self) -> &[ContainerEntry] {
        &self.entries
    }

    /// Decompress an entry.
    pub fn read_entry(&mut self, entry: &ContainerEntry) -> Result<Vec<u8>> {
        let mut file = self.archive.by_index(entry.index).map_err(|e| {
            Error::ContainerFormat(format!("Failed to open '{}': {}", entry.logical_path, e))
        })?;

        // The declared size is untrusted, so the buffer grows with the data.
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            Error::ContainerFormat(format!("Failed to read '{}': {}", entry.logical_path, e))
        })?;

        if bytes.len() as u64 != file.size() {
            return Err(Error::ContainerFormat(format!(
                "'{}' declares {} bytes but holds {}",
                entry.logical_path,
                file.size(),
                bytes.len()
            )));
        }

        Ok(bytes)
    }

    /// Decompress an entry and decode it as UTF-8, dropping a leading BOM.
    pub fn read_entry_as_text(&mut self, entry: &ContainerEntry) -> Result<String> {
        let bytes = self.read_entry(entry)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::EntryDecode {
            path: entry.logical_path.clone(),
            reason: e.utf8_error().to_string(),
        })?;

        Ok(match text.strip_prefix('\u{FEFF}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn zip_of(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("ppt/", FileOptions::default()).unwrap();
        for (path, data) in members {
            writer.start_file(*path, FileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_lists_files_in_archive_order() {
        let bytes = zip_of(&[("ppt/b.xml", b"b"), ("ppt/a.xml", b"a")]);
        let container = Container::open(&bytes).unwrap();

        let paths: Vec<&str> = container.entries().iter().map(|e| e.logical_path.as_str()).collect();
        assert_eq!(paths, vec!["ppt/b.xml", "ppt/a.xml"]);
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let err = Container::open(b"definitely not a zip").err().unwrap();
        assert!(matches!(err, Error::ContainerFormat(_)));
    }

    #[test]
    fn test_read_entry_as_text() {
        let bytes = zip_of(&[("doc.xml", "\u{FEFF}<x>é</x>".as_bytes())]);
        let mut container = Container::open(&bytes).unwrap();
        let entry = container.entries()[0].clone();

        assert_eq!(container.read_entry_as_text(&entry).unwrap(), "<x>é</x>");
    }

    /// A stored, empty entry whose central directory claims a zip64
    /// uncompressed size of `u64::MAX`.
    fn zip_with_oversized_entry(name: &str) -> Vec<u8> {
        let name = name.as_bytes();
        let mut bytes = Vec::new();

        // Local file header
        bytes.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        bytes.extend_from_slice(&45u16.to_le_bytes()); // version needed
        bytes.extend_from_slice(&0u16.to_le_bytes()); // flags
        bytes.extend_from_slice(&0u16.to_le_bytes()); // stored
        bytes.extend_from_slice(&0u16.to_le_bytes()); // time
        bytes.extend_from_slice(&0x21u16.to_le_bytes()); // 1980-01-01
        bytes.extend_from_slice(&0u32.to_le_bytes()); // crc32 of no data
        bytes.extend_from_slice(&0u32.to_le_bytes()); // compressed size
        bytes.extend_from_slice(&0u32.to_le_bytes()); // uncompressed size
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(name);

        // Central directory
        let directory_offset = bytes.len() as u32;
        bytes.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        bytes.extend_from_slice(&45u16.to_le_bytes()); // made by
        bytes.extend_from_slice(&45u16.to_le_bytes()); // version needed
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0x21u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // compressed size
        bytes.extend_from_slice(&u32::MAX.to_le_bytes()); // size in zip64 extra
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&12u16.to_le_bytes()); // extra length
        bytes.extend_from_slice(&0u16.to_le_bytes()); // comment length
        bytes.extend_from_slice(&0u16.to_le_bytes()); // disk
        bytes.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
        bytes.extend_from_slice(&0u32.to_le_bytes()); // external attributes
        bytes.extend_from_slice(&0u32.to_le_bytes()); // local header offset
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(&0x0001u16.to_le_bytes()); // zip64 extended info
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let directory_size = bytes.len() as u32 - directory_offset;

        // End of central directory
        bytes.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&directory_size.to_le_bytes());
        bytes.extend_from_slice(&directory_offset.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes
    }

    #[test]
    fn test_read_entry_rejects_oversized_declared_length() {
        let bytes = zip_with_oversized_entry("ppt/slides/slide1.xml");
        let mut container = Container::open(&bytes).unwrap();
        let entry = container.entries()[0].clone();

        let err = container.read_entry(&entry).unwrap_err();
        assert!(matches!(err, Error::ContainerFormat(_)));
    }

    #[test]
    fn test_read_entry_as_text_rejects_invalid_utf8() {
        let bytes = zip_of(&[("bad.xml", &[0x3C, 0xFF, 0xFE, 0x3E])]);
        let mut container = Container::open(&bytes).unwrap();
        let entry = container.entries()[0].clone();

        let err = container.read_entry_as_text(&entry).unwrap_err();
        assert!(matches!(err, Error::EntryDecode { ref path, .. } if path == "bad.xml"));
    }
}
