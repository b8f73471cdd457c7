//! Opened per-date archive.

use std::io::{Cursor, Read};

use bytes::Bytes;
use chips_core::ChipsError;
use zip::ZipArchive;
use zip::result::ZipError;

/// Upper bound on the buffer preallocated from a ZIP header's declared size.
pub const READ_CAPACITY_HINT: usize = 4 * 1024 * 1024;

/// An opened ZIP container for one trading date.
///
/// Cloning shares the underlying bytes and central directory, so each reader
/// gets its own cursor without copying the archive.
#[derive(Clone)]
pub struct ArchiveHandle {
    date: String,
    zip: ZipArchive<Cursor<Bytes>>,
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveHandle").field("date", &self.date).field("entries", &self.zip.len()).finish()
    }
}

impl ArchiveHandle {
    /// Open `bytes` as a ZIP archive. A corrupt container counts as
    /// unavailable.
    pub fn open(date: &str, bytes: Bytes) -> Result<Self, ChipsError> {
        let zip = ZipArchive::new(Cursor::new(bytes)).map_err(|e| ChipsError::ArchiveUnavailable {
            date: date.to_string(),
            reason: format!("bad zip: {e}"),
        })?;
        Ok(Self { date: date.to_string(), zip })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Whether an entry with exactly this path exists.
    pub fn contains(&self, name: &str) -> bool {
        self.zip.file_names().any(|n| n == name)
    }

    /// Read one entry fully. `Ok(None)` when the entry does not exist.
    ///
    /// The declared entry size only seeds the buffer up to [`READ_CAPACITY_HINT`].
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ChipsError> {
        let mut zip = self.zip.clone();
        match zip.by_name(name) {
            Ok(mut file) => {
                let hint = usize::try_from(file.size()).unwrap_or(usize::MAX).min(READ_CAPACITY_HINT);
                let mut buf = Vec::with_capacity(hint);
                file.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(ChipsError::ArchiveUnavailable {
                date: self.date.clone(),
                reason: format!("entry {name}: {e}"),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    /// Build an in-memory ZIP from `(path, content)` pairs.
    pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn read_existing_and_missing() {
        let h = ArchiveHandle::open("20251111", zip_bytes(&[("20251111/2330.csv", b"abc".as_slice())])).unwrap();
        assert_eq!(h.len(), 1);
        assert!(h.contains("20251111/2330.csv"));
        assert_eq!(h.read("20251111/2330.csv").unwrap().as_deref(), Some(b"abc".as_slice()));
        assert!(h.read("20251111/2317.csv").unwrap().is_none());
    }

    #[test]
    fn clones_read_independently() {
        let h = ArchiveHandle::open("d", zip_bytes(&[("a.csv", b"1".as_slice()), ("b.csv", b"2".as_slice())])).unwrap();
        let h2 = h.clone();
        assert_eq!(h.read("b.csv").unwrap().unwrap(), b"2");
        assert_eq!(h2.read("a.csv").unwrap().unwrap(), b"1");
    }

    #[test]
    fn reads_entry_larger_than_capacity_hint() {
        let big = vec![b'x'; READ_CAPACITY_HINT + 10];
        let h = ArchiveHandle::open("d", zip_bytes(&[("big.csv", big.as_slice())])).unwrap();
        assert_eq!(h.read("big.csv").unwrap().map(|b| b.len()), Some(READ_CAPACITY_HINT + 10));
    }

    #[test]
    fn corrupt_archive_is_unavailable() {
        let err = ArchiveHandle::open("20251111", Bytes::from_static(b"not a zip")).unwrap_err();
        assert!(matches!(err, ChipsError::ArchiveUnavailable { .. }));
    }
}
