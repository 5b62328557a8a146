use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::StorageError;

/// バケットとキーで識別されるオブジェクトの位置
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// 配信結果として返す位置識別子
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// パイプラインが使うオブジェクトストア操作
///
/// どの操作も内部でリトライしない。再試行は呼び出し元プラットフォームの再配信に任せる。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// オブジェクト全体を `dest` に書き出し、書き込んだバイト数を返す
    async fn download(&self, object: &ObjectLocation, dest: &Path) -> Result<u64, StorageError>;

    /// `src` の内容をアップロードし（同じキーは上書き）、位置識別子を返す
    async fn upload(
        &self,
        object: &ObjectLocation,
        src: &Path,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// ストア側でコピーする（内容はパイプラインを経由しない）
    async fn copy(&self, from: &ObjectLocation, to: &ObjectLocation) -> Result<(), StorageError>;

    /// オブジェクトを削除する
    async fn delete(&self, object: &ObjectLocation) -> Result<(), StorageError>;

    /// オブジェクトが存在するか確認する
    async fn exists(&self, object: &ObjectLocation) -> Result<bool, StorageError>;
}
