//! In-memory spectrum store

use super::SpectrumStore;
use crate::error::{Result, SpectrumError};
use crate::spectrum::SpectrumResult;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

/// In-memory persistence for tests and embedded use
/// 
/// Thread-safe via `RwLock`. Not durable.
#[derive(Debug, Default)]
pub struct InMemorySpectrumStore {
    results: RwLock<BTreeMap<String, SpectrumResult>>,
}

impl InMemorySpectrumStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpectrumStore for InMemorySpectrumStore {
    fn store(&self, timestamp: &str, result: &SpectrumResult) -> Result<()> {
        let mut store = self
            .results
            .write()
            .map_err(|e| SpectrumError::Storage(e.to_string()))?;

        store.insert(timestamp.to_string(), result.clone());
        Ok(())
    }

    fn retrieve(&self, timestamp: &str) -> Result<SpectrumResult> {
        let store = self
            .results
            .read()
            .map_err(|e| SpectrumError::Storage(e.to_string()))?;

        store
            .get(timestamp)
            .cloned()
            .ok_or_else(|| SpectrumError::NotFound(timestamp.to_string()))
    }

    fn timestamps_between(&self, start: &str, end: &str) -> Result<Vec<String>> {
        if start > end {
            return Ok(Vec::new());
        }

        let store = self
            .results
            .read()
            .map_err(|e| SpectrumError::Storage(e.to_string()))?;

        Ok(store
            .range::<str, _>((Bound::Included(start), Bound::Included(end)))
            .map(|(timestamp, _)| timestamp.clone())
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::BandKey;
    use crate::waveform::Quantity;

    fn sample(scale: f64) -> SpectrumResult {
        let mut s = SpectrumResult::from_lines(vec![0.0, scale, 2.0 * scale], 1.0, Quantity::Acceleration).unwrap();
        s.record_band_peak(BandKey::new(0, 2), 2.0 * scale).unwrap();
        s
    }

    #[test]
    fn test_store_retrieve() {
        let store = InMemorySpectrumStore::new();
        store.store("2024-01-01", &sample(1.0)).unwrap();

        assert_eq!(store.retrieve("2024-01-01").unwrap(), sample(1.0));
        assert!(matches!(
            store.retrieve("2024-01-02"),
            Err(SpectrumError::NotFound(_))
        ));

        // Overwrite
        store.store("2024-01-01", &sample(3.0)).unwrap();
        assert_eq!(store.retrieve("2024-01-01").unwrap(), sample(3.0));
        assert_eq!(store.timestamps_between("2024-01-01", "2024-01-01").unwrap().len(), 1);
    }

    #[test]
    fn test_timestamps_between() {
        let store = InMemorySpectrumStore::new();
        for ts in ["2024-01-03", "2024-01-01", "2024-02-01", "2023-12-31"] {
            store.store(ts, &sample(1.0)).unwrap();
        }

        assert_eq!(
            store.timestamps_between("2024-01-01", "2024-01-31").unwrap(),
            vec!["2024-01-01".to_string(), "2024-01-03".to_string()]
        );
        assert!(store.timestamps_between("2024-02-02", "2024-01-01").unwrap().is_empty());
    }
}
