//! aws-sdk-s3 による `ObjectStore` 実装。

use std::path::Path;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use tokio::io::AsyncWriteExt;

use crate::errors::StorageError;
use crate::storage::store::{ObjectLocation, ObjectStore};

/// S3 クライアントの接続設定
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// AWS リージョン（未指定時は SDK の既定解決）
    pub region: Option<String>,

    /// カスタムエンドポイント（LocalStack / MinIO 用、パススタイルになる）
    pub endpoint: Option<String>,
}

impl S3Config {
    /// 環境変数から読み込む（AWS_REGION / S3_ENDPOINT_URL、どちらも任意）
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        Self {
            region: non_empty("AWS_REGION"),
            endpoint: non_empty("S3_ENDPOINT_URL"),
        }
    }
}

/// S3 クライアントを作成する
pub async fn create_s3_client(config: &S3Config) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    let builder = aws_sdk_s3::config::Builder::from(&shared);

    // カスタムエンドポイントはパススタイルでアクセスする
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    Client::from_conf(s3_config)
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    MissingKey,
    MissingBucket,
    Denied,
    Other,
}

/// ステータスとエラーコードから失敗の種類を判定する
///
/// NoSuchBucket も 404 で返るため、キーの不在とは区別する。
fn failure_kind(status: Option<u16>, code: Option<&str>) -> FailureKind {
    match (status, code) {
        (_, Some("NoSuchBucket")) => FailureKind::MissingBucket,
        (_, Some("NoSuchKey" | "NotFound")) | (Some(404), None) => FailureKind::MissingKey,
        (Some(403), _) | (_, Some("AccessDenied")) => FailureKind::Denied,
        _ => FailureKind::Other,
    }
}

/// SDK エラーを StorageError に分類する
fn storage_error<E>(err: SdkError<E, HttpResponse>, object: &ObjectLocation) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());

    match failure_kind(status, err.code()) {
        FailureKind::MissingKey => StorageError::NotFound {
            bucket: object.bucket.clone(),
            key: object.key.clone(),
        },
        FailureKind::MissingBucket => {
            tracing::error!(bucket = %object.bucket, "bucket does not exist");
            StorageError::BucketNotFound {
                bucket: object.bucket.clone(),
            }
        }
        FailureKind::Denied => {
            tracing::error!(bucket = %object.bucket, key = %object.key, "access denied by S3");
            StorageError::Forbidden {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
            }
        }
        FailureKind::Other => StorageError::Internal(DisplayErrorContext(&err).to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn download(&self, object: &ObjectLocation, dest: &Path) -> Result<u64, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| storage_error(e, object))?;

        // メモリに全体を載せず、チャンク単位でステージングファイルへ書き出す
        let mut body = output.body;
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::Internal(format!("body read failed: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    async fn upload(
        &self,
        object: &ObjectLocation,
        src: &Path,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let body = ByteStream::from_path(src)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| storage_error(e, object))?;

        Ok(object.uri())
    }

    async fn copy(&self, from: &ObjectLocation, to: &ObjectLocation) -> Result<(), StorageError> {
        let copy_source = format!("{}/{}", from.bucket, urlencoding::encode(&from.key));

        self.client
            .copy_object()
            .copy_source(copy_source)
            .bucket(&to.bucket)
            .key(&to.key)
            .send()
            .await
            .map_err(|e| storage_error(e, from))?;

        Ok(())
    }

    async fn delete(&self, object: &ObjectLocation) -> Result<(), StorageError> {
        // S3 の DeleteObject は存在しないキーでも成功する
        match self
            .client
            .delete_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| storage_error(e, object))
        {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn exists(&self, object: &ObjectLocation) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| storage_error(e, object))
        {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
