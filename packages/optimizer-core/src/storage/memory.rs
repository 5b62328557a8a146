//! プロセス内で完結する `ObjectStore` 実装。
//!
//! 呼び出し履歴を記録し、操作ごとに失敗や遅延を注入できる。

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::StorageError;
use crate::storage::store::{ObjectLocation, ObjectStore};

/// ストア操作の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Download,
    Upload,
    Copy,
    Delete,
    Exists,
}

/// 記録された 1 回の呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub operation: StoreOperation,
    pub object: ObjectLocation,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<ObjectLocation, StoredObject>>,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<HashSet<StoreOperation>>,
    latency: Option<Duration>,
    operation_latency: HashMap<StoreOperation, Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作の前に待ち時間を入れる
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// 指定した操作だけに待ち時間を入れる
    pub fn with_operation_latency(mut self, operation: StoreOperation, latency: Duration) -> Self {
        self.operation_latency.insert(operation, latency);
        self
    }

    pub fn insert(&self, object: ObjectLocation, body: impl Into<Bytes>) {
        lock(&self.objects).insert(
            object,
            StoredObject {
                body: body.into(),
                content_type: None,
            },
        );
    }

    pub fn get(&self, object: &ObjectLocation) -> Option<StoredObject> {
        lock(&self.objects).get(object).cloned()
    }

    pub fn remove(&self, object: &ObjectLocation) -> Option<StoredObject> {
        lock(&self.objects).remove(object)
    }

    pub fn contains(&self, object: &ObjectLocation) -> bool {
        lock(&self.objects).contains_key(object)
    }

    /// 指定した操作を以降すべて失敗させる
    pub fn fail_on(&self, operation: StoreOperation) {
        lock(&self.failures).insert(operation);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, operation: StoreOperation) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    async fn enter(&self, operation: StoreOperation, object: &ObjectLocation) -> Result<(), StorageError> {
        lock(&self.calls).push(StoreCall {
            operation,
            object: object.clone(),
        });

        let latency = self
            .operation_latency
            .get(&operation)
            .copied()
            .or(self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if lock(&self.failures).contains(&operation) {
            return Err(StorageError::Internal(format!("injected {operation:?} failure")));
        }
        Ok(())
    }

    fn not_found(object: &ObjectLocation) -> StorageError {
        StorageError::NotFound {
            bucket: object.bucket.clone(),
            key: object.key.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn download(&self, object: &ObjectLocation, dest: &Path) -> Result<u64, StorageError> {
        self.enter(StoreOperation::Download, object).await?;
        let stored = self.get(object).ok_or_else(|| Self::not_found(object))?;
        tokio::fs::write(dest, &stored.body).await?;
        Ok(stored.body.len() as u64)
    }

    async fn upload(
        &self,
        object: &ObjectLocation,
        src: &Path,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.enter(StoreOperation::Upload, object).await?;
        let body = tokio::fs::read(src).await?;
        lock(&self.objects).insert(
            object.clone(),
            StoredObject {
                body: Bytes::from(body),
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(object.uri())
    }

    async fn copy(&self, from: &ObjectLocation, to: &ObjectLocation) -> Result<(), StorageError> {
        self.enter(StoreOperation::Copy, to).await?;
        let stored = self.get(from).ok_or_else(|| Self::not_found(from))?;
        lock(&self.objects).insert(to.clone(), stored);
        Ok(())
    }

    async fn delete(&self, object: &ObjectLocation) -> Result<(), StorageError> {
        self.enter(StoreOperation::Delete, object).await?;
        // S3 と同じく、存在しないキーの削除も成功扱い
        self.remove(object);
        Ok(())
    }

    async fn exists(&self, object: &ObjectLocation) -> Result<bool, StorageError> {
        self.enter(StoreOperation::Exists, object).await?;
        Ok(self.contains(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_download_and_upload() {
        let store = MemoryObjectStore::new();
        let source = ObjectLocation::new("b", "k.bin");
        store.insert(source.clone(), &b"hello"[..]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged");
        assert_eq!(store.download(&source, &path).await.unwrap(), 5);

        let dest = ObjectLocation::new("b", "out.bin");
        let location = store.upload(&dest, &path, "application/octet-stream").await.unwrap();
        assert_eq!(location, "s3://b/out.bin");
        assert_eq!(store.get(&dest).unwrap().body, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_download_missing() {
        let store = MemoryObjectStore::new();
        let dir = tempfile::tempdir().unwrap();
        let result = store
            .download(&ObjectLocation::new("b", "missing"), &dir.path().join("x"))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryObjectStore::new();
        let object = ObjectLocation::new("b", "k");
        store.insert(object.clone(), &b"x"[..]);

        assert!(store.delete(&object).await.is_ok());
        assert!(store.delete(&object).await.is_ok());
        assert!(!store.contains(&object));
        assert_eq!(store.count(StoreOperation::Delete), 2);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MemoryObjectStore::new();
        store.fail_on(StoreOperation::Exists);
        assert!(store.exists(&ObjectLocation::new("b", "k")).await.is_err());
    }
}
