//! Analysis storage
//!
//! Uploaded documents are analysed once; later uploads of the same bytes are
//! answered from the stored record.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::AnalysisReport;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("report store lock poisoned")]
    Poisoned,
}

/// One analysed upload
#[derive(Debug, Clone, Serialize)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub filename: String,
    /// SHA-256 of the uploaded bytes
    pub file_hash: String,
    pub risk_score: u8,
    pub transparency_score: u8,
    pub created_at: DateTime<Utc>,
    pub report: AnalysisReport,
}

pub trait ReportStore: Send + Sync {
    fn find_by_hash(&self, file_hash: &str) -> Result<Option<StoredAnalysis>, StoreError>;

    /// Store a report. If a record with the same hash already exists it is
    /// returned unchanged and the new report is dropped.
    fn save(
        &self,
        filename: &str,
        file_hash: &str,
        report: AnalysisReport,
    ) -> Result<StoredAnalysis, StoreError>;

    fn get(&self, id: Uuid) -> Result<Option<StoredAnalysis>, StoreError>;

    /// Newest first
    fn recent(&self, limit: usize) -> Result<Vec<StoredAnalysis>, StoreError>;
}

#[derive(Default)]
struct Records {
    /// Insertion order, oldest first
    entries: Vec<StoredAnalysis>,
    by_id: HashMap<Uuid, usize>,
    by_hash: HashMap<String, usize>,
}

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for MemoryStore {
    fn find_by_hash(&self, file_hash: &str) -> Result<Option<StoredAnalysis>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .by_hash
            .get(file_hash)
            .map(|&idx| records.entries[idx].clone()))
    }

    fn save(
        &self,
        filename: &str,
        file_hash: &str,
        report: AnalysisReport,
    ) -> Result<StoredAnalysis, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(&idx) = records.by_hash.get(file_hash) {
            debug!(file_hash, "hash already stored, keeping existing record");
            return Ok(records.entries[idx].clone());
        }

        let stored = StoredAnalysis {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            file_hash: file_hash.to_string(),
            risk_score: report.risk_score,
            transparency_score: report.transparency_score,
            created_at: Utc::now(),
            report,
        };
        let idx = records.entries.len();
        records.by_id.insert(stored.id, idx);
        records.by_hash.insert(stored.file_hash.clone(), idx);
        records.entries.push(stored.clone());
        Ok(stored)
    }

    fn get(&self, id: Uuid) -> Result<Option<StoredAnalysis>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.by_id.get(&id).map(|&idx| records.entries[idx].clone()))
    }

    fn recent(&self, limit: usize) -> Result<Vec<StoredAnalysis>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.entries.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ClassificationMethod, Persona};
    use tokio_test::assert_ok;

    fn report(risk_score: u8) -> AnalysisReport {
        let mut report = AnalysisReport::empty(Persona::default(), ClassificationMethod::Patterns);
        report.risk_score = risk_score;
        report
    }

    #[test]
    fn test_save_and_get() {
        let store = MemoryStore::new();
        let saved = assert_ok!(store.save("terms.txt", "abc", report(42)));
        assert_eq!(saved.risk_score, 42);
        assert_eq!(saved.transparency_score, 100);

        let fetched = assert_ok!(store.get(saved.id)).unwrap();
        assert_eq!(fetched.filename, "terms.txt");
        assert_eq!(fetched.report.risk_score, 42);
        assert!(assert_ok!(store.get(Uuid::new_v4())).is_none());
    }

    #[test]
    fn test_one_record_per_hash() {
        let store = MemoryStore::new();
        let first = assert_ok!(store.save("a.txt", "same", report(10)));
        let second = assert_ok!(store.save("b.txt", "same", report(90)));
        assert_eq!(first.id, second.id);
        assert_eq!(second.filename, "a.txt");
        assert_eq!(second.risk_score, 10);
        assert_eq!(assert_ok!(store.recent(10)).len(), 1);
        assert_eq!(assert_ok!(store.find_by_hash("same")).unwrap().id, first.id);
        assert!(assert_ok!(store.find_by_hash("other")).is_none());
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        for i in 0..5u8 {
            assert_ok!(store.save(&format!("{}.txt", i), &i.to_string(), report(i)));
        }
        let recent = assert_ok!(store.recent(3));
        let names: Vec<&str> = recent.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["4.txt", "3.txt", "2.txt"]);
    }
}
