//! Spectrum store backed by a directory of JSON files
//! 
//! File layout: `{root}/{timestamp}.json`, one pretty-printed result per file.

use super::SpectrumStore;
use crate::error::{Result, SpectrumError};
use crate::spectrum::SpectrumResult;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const EXTENSION: &str = "json";

/// Durable store writing one JSON document per timestamp
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    root: PathBuf,
}

impl JsonDirectoryStore {
    /// Open or create the store directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened spectrum store");
        Ok(Self { root })
    }

    /// File path for a timestamp, rejecting anything that could escape the root
    fn path_for(&self, timestamp: &str) -> Result<PathBuf> {
        let unsafe_name = timestamp.is_empty()
            || timestamp.starts_with('.')
            || timestamp.contains(['/', '\\', '\0']);
        if unsafe_name {
            return Err(SpectrumError::InvalidInput(format!(
                "timestamp '{}' cannot be used as a file name",
                timestamp
            )));
        }
        Ok(self.root.join(format!("{}.{}", timestamp, EXTENSION)))
    }
}

impl SpectrumStore for JsonDirectoryStore {
    fn store(&self, timestamp: &str, result: &SpectrumResult) -> Result<()> {
        let path = self.path_for(timestamp)?;

        // Uniquely named temp file in the same directory, renamed over the
        // target so readers never see a partial document
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), result)?;
        tmp.as_file_mut().flush()?;
        tmp.persist(&path).map_err(|e| SpectrumError::Io(e.error))?;

        debug!(timestamp, path = %path.display(), "stored spectrum");
        Ok(())
    }

    fn retrieve(&self, timestamp: &str) -> Result<SpectrumResult> {
        let path = self.path_for(timestamp)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SpectrumError::NotFound(timestamp.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn timestamps_between(&self, start: &str, end: &str) -> Result<Vec<String>> {
        if start > end {
            return Ok(Vec::new());
        }

        let mut timestamps = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem >= start && stem <= end {
                    timestamps.push(stem.to_string());
                }
            }
        }

        timestamps.sort();
        Ok(timestamps)
    }

    fn backend_name(&self) -> &'static str {
        "JsonDirectory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::BandKey;
    use crate::waveform::Quantity;

    fn sample() -> SpectrumResult {
        // Values that do not survive a lossy float round trip
        let mags = (0..64).map(|k| (k as f64 * 0.1).sin().abs() / 3.0).collect();
        let mut s = SpectrumResult::from_lines(mags, 0.3, Quantity::Velocity)
            .unwrap()
            .with_min_frequency(0.9)
            .unwrap();
        s.record_band_peak(BandKey::new(3, 20), 0.33).unwrap();
        s
    }

    #[test]
    fn test_store_retrieve_equal() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectoryStore::open(dir.path()).unwrap();

        store.store("2024-05-01T08:00:00", &sample()).unwrap();
        assert_eq!(store.retrieve("2024-05-01T08:00:00").unwrap(), sample());

        // A second handle on the same directory sees the data
        let reopened = JsonDirectoryStore::open(dir.path()).unwrap();
        assert_eq!(reopened.retrieve("2024-05-01T08:00:00").unwrap(), sample());
    }

    #[test]
    fn test_missing_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectoryStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.retrieve("2024-05-02"),
            Err(SpectrumError::NotFound(_))
        ));
    }

    #[test]
    fn test_rejects_path_like_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectoryStore::open(dir.path()).unwrap();

        for bad in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.store(bad, &sample()),
                Err(SpectrumError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_concurrent_writers_same_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectoryStore::open(dir.path()).unwrap();

        let candidates: Vec<SpectrumResult> = (1..=8)
            .map(|i| SpectrumResult::from_lines(vec![0.0, i as f64, 1.0], 1.0, Quantity::Velocity).unwrap())
            .collect();

        std::thread::scope(|scope| {
            for candidate in &candidates {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..10 {
                        store.store("2024-05-10", candidate).unwrap();
                    }
                });
            }
        });

        let stored = store.retrieve("2024-05-10").unwrap();
        assert!(candidates.contains(&stored));

        // No temp files left behind next to the result
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_timestamps_between_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirectoryStore::open(dir.path()).unwrap();
        for ts in ["2024-05-03", "2024-05-01", "2024-06-01"] {
            store.store(ts, &sample()).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            store.timestamps_between("2024-05-01", "2024-05-31").unwrap(),
            vec!["2024-05-01".to_string(), "2024-05-03".to_string()]
        );
    }
}
