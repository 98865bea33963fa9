use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{LogStore, StoreError};
use crate::maintenance_log::models::LogRecord;

#[derive(Default)]
pub struct MemoryLogStore {
    records: RwLock<HashMap<String, LogRecord>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn insert(&self, record: LogRecord) -> Result<LogRecord, StoreError> {
        let mut records = self.records.write();
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<LogRecord>, StoreError> {
        let mut logs: Vec<LogRecord> = self.records.read().values().cloned().collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(logs)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self.records.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn log(id: &str, timestamp: &str) -> LogRecord {
        LogRecord {
            id: id.to_string(),
            title: format!("Issue {}", id),
            timestamp: timestamp.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_and_keeps_first() {
        let store = MemoryLogStore::new();
        store.insert(log("L1", "2024-01-01")).await.unwrap();

        let mut dup = log("L1", "2024-02-02");
        dup.title = "Other".to_string();
        assert!(matches!(store.insert(dup).await, Err(StoreError::Conflict(id)) if id == "L1"));

        let logs = store.list().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].title, "Issue L1");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryLogStore::new();
        store.insert(log("a", "2024-01-01")).await.unwrap();
        store.insert(log("b", "2024-03-01")).await.unwrap();
        store.insert(log("c", "2024-02-01")).await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryLogStore::new();
        store.insert(log("L1", "2024-01-01")).await.unwrap();
        store.delete("L1").await.unwrap();
        assert!(matches!(store.delete("L1").await, Err(StoreError::NotFound(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_same_id_one_wins() {
        let store = Arc::new(MemoryLogStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut record = log("L1", "2024-01-01");
                record.title = format!("writer {}", i);
                store.insert(record).await.is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
