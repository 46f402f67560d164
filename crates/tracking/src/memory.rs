//! An in-process point store.
//!
//! Keeps every fix in memory and builds lines itself. Useful for local runs
//! and as the store double in tests: it counts calls and can be switched to
//! fail reads or appends.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use model::{fix::Fix, window::TimeWindow};
use serde_json::json;
use tokio::sync::RwLock;

use crate::database::{
    Database, DatabaseAutocommit, DatabaseError, DatabaseOperations, Result, TrackRepo,
};

#[derive(Debug)]
struct StoredFix {
    sequence: u64,
    fix: Fix,
}

#[derive(Debug, Default)]
struct Inner {
    fixes: RwLock<Vec<StoredFix>>,
    appends: AtomicUsize,
    reads: AtomicUsize,
    fail_appends: AtomicBool,
    fail_fixes: AtomicBool,
    fail_lines: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Inner>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `append` calls seen, including failed ones.
    pub fn append_count(&self) -> usize {
        self.inner.appends.load(Ordering::SeqCst)
    }

    /// Number of `ordered_fixes` and `aggregated_line` calls seen.
    pub fn read_count(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    pub fn fail_appends(&self, fail: bool) {
        self.inner.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fixes(&self, fail: bool) {
        self.inner.fail_fixes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lines(&self, fail: bool) {
        self.inner.fail_lines.store(fail, Ordering::SeqCst);
    }
}

impl Database for MemoryDatabase {
    type Autocommit = MemoryAutocommit;

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            inner: self.inner.clone(),
        }
    }
}

pub struct MemoryAutocommit {
    inner: Arc<Inner>,
}

impl MemoryAutocommit {
    /// Fixes of the device in `window`, ordered by timestamp and then by
    /// insertion sequence.
    async fn select(&self, device_id: &str, window: TimeWindow) -> Vec<Fix> {
        let fixes = self.inner.fixes.read().await;
        let mut selected = fixes
            .iter()
            .filter(|stored| {
                stored.fix.device_id == device_id && window.contains(&stored.fix.timestamp)
            })
            .collect::<Vec<_>>();
        selected.sort_by_key(|stored| (stored.fix.timestamp, stored.sequence));
        selected.into_iter().map(|stored| stored.fix.clone()).collect()
    }
}

impl DatabaseOperations for MemoryAutocommit {}

impl DatabaseAutocommit for MemoryAutocommit {}

#[async_trait]
impl TrackRepo for MemoryAutocommit {
    async fn append(&mut self, fix: Fix) -> Result<()> {
        self.inner.appends.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_appends.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable);
        }

        let mut fixes = self.inner.fixes.write().await;
        let sequence = fixes.len() as u64;
        fixes.push(StoredFix { sequence, fix });
        Ok(())
    }

    async fn ordered_fixes(
        &mut self,
        device_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<Fix>> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_fixes.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable);
        }

        Ok(self.select(device_id, window).await)
    }

    async fn aggregated_line(
        &mut self,
        device_id: &str,
        window: TimeWindow,
    ) -> Result<Option<String>> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_lines.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable);
        }

        let fixes = self.select(device_id, window).await;
        if fixes.is_empty() {
            return Ok(None);
        }
        let coordinates = fixes
            .iter()
            .map(|fix| [fix.longitude, fix.latitude])
            .collect::<Vec<_>>();
        Ok(Some(
            json!({ "type": "LineString", "coordinates": coordinates }).to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn fix(device_id: &str, seconds: i64, latitude: f64) -> Fix {
        Fix {
            device_id: device_id.to_owned(),
            latitude,
            longitude: 0.0,
            timestamp: at(seconds),
        }
    }

    #[tokio::test]
    async fn filters_by_device_and_window() {
        let database = MemoryDatabase::new();
        let mut auto = database.auto();
        auto.append(fix("d1", 0, 1.0)).await.unwrap();
        auto.append(fix("d1", 60, 2.0)).await.unwrap();
        auto.append(fix("d1", 120, 3.0)).await.unwrap();
        auto.append(fix("d2", 60, 9.0)).await.unwrap();

        let fixes = auto
            .ordered_fixes("d1", TimeWindow::range(at(0), at(120)))
            .await
            .unwrap();

        assert_eq!(
            fixes.iter().map(|fix| fix.latitude).collect::<Vec<_>>(),
            [1.0, 2.0]
        );
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let database = MemoryDatabase::new();
        let mut auto = database.auto();
        auto.append(fix("d1", 30, 3.0)).await.unwrap();
        auto.append(fix("d1", 30, 1.0)).await.unwrap();
        auto.append(fix("d1", 0, 0.0)).await.unwrap();
        auto.append(fix("d1", 30, 2.0)).await.unwrap();

        let fixes = auto
            .ordered_fixes("d1", TimeWindow::Unbounded)
            .await
            .unwrap();

        assert_eq!(
            fixes.iter().map(|fix| fix.latitude).collect::<Vec<_>>(),
            [0.0, 3.0, 1.0, 2.0]
        );
    }

    #[tokio::test]
    async fn line_is_absent_without_fixes() {
        let database = MemoryDatabase::new();
        let line = database
            .auto()
            .aggregated_line("d1", TimeWindow::Unbounded)
            .await
            .unwrap();
        assert_eq!(line, None);
    }

    #[tokio::test]
    async fn counts_calls_and_injects_failures() {
        let database = MemoryDatabase::new();
        database.fail_appends(true);

        let result = database.auto().append(fix("d1", 0, 1.0)).await;

        assert!(matches!(result, Err(DatabaseError::Unavailable)));
        assert_eq!(database.append_count(), 1);
        assert!(database
            .auto()
            .ordered_fixes("d1", TimeWindow::Unbounded)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(database.read_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_are_returned_sorted() {
        let database = MemoryDatabase::new();
        let offsets = [7, 3, 9, 0, 5, 1, 8, 2, 6, 4];

        let tasks = offsets
            .iter()
            .map(|&offset| {
                let database = database.clone();
                tokio::spawn(async move {
                    database.auto().append(fix("d1", offset, offset as f64)).await
                })
            })
            .collect::<Vec<_>>();
        for task in futures::future::join_all(tasks).await {
            task.unwrap().unwrap();
        }

        let fixes = database
            .auto()
            .ordered_fixes("d1", TimeWindow::Unbounded)
            .await
            .unwrap();

        assert_eq!(fixes.len(), offsets.len());
        assert!(fixes
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp));
    }
}
