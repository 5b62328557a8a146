use std::future::Future;
use std::sync::Arc;

use aws_lambda_events::event::s3::S3Event;

use crate::config::{OptimizerConfig, UnsupportedTypePolicy};
use crate::errors::{ConfigError, PipelineError, StorageError, TransformError};
use crate::event::ObjectCreated;
use crate::pipeline::deadline::Deadline;
use crate::pipeline::outcome::{Action, Cleanup, Outcome};
use crate::staging::StagingArea;
use crate::storage::{ObjectLocation, ObjectStore};
use crate::transform::{Classification, EncodeSettings, FormatRegistry, transcode};

/// 分類 → 取得 → 変換 → 配信 → 削除 を 1 オブジェクト分実行する
pub struct Pipeline {
    config: OptimizerConfig,
    registry: FormatRegistry,
    store: Arc<dyn ObjectStore>,
}

impl Pipeline {
    /// 設定を検証してからパイプラインを作成する（外部呼び出しは行わない）
    pub fn new(config: OptimizerConfig, store: Arc<dyn ObjectStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = config.format_registry();
        Ok(Self {
            config,
            registry,
            store,
        })
    }

    /// S3 通知を処理する
    pub async fn handle_event(
        &self,
        event: &S3Event,
        deadline: Deadline,
    ) -> Result<Outcome, PipelineError> {
        let created = ObjectCreated::from_s3_event(event)?;
        self.process(&created, deadline).await
    }

    /// 作成イベント 1 件を処理する
    pub async fn process(
        &self,
        created: &ObjectCreated,
        deadline: Deadline,
    ) -> Result<Outcome, PipelineError> {
        if created.bucket != self.config.source_bucket {
            return Err(PipelineError::Event(format!(
                "notification is for bucket {}, expected {}",
                created.bucket, self.config.source_bucket
            )));
        }

        let source = created.location();
        let destination = ObjectLocation::new(
            &self.config.destination_bucket,
            self.config.destination_key(&created.key),
        );
        if source == destination {
            tracing::warn!(
                bucket = %source.bucket,
                key = %source.key,
                "destination is the source object, output overwrites its input"
            );
        }

        tracing::info!(
            source = %source,
            destination = %destination,
            size = ?created.size,
            remaining_ms = ?deadline.remaining().map(|d| d.as_millis()),
            "received object"
        );

        let action = match self.registry.classify_key(&source.key) {
            Classification::Supported(settings) => {
                self.optimize(&source, &destination, settings, deadline).await?
            }
            Classification::Unsupported { extension } => match self.config.unsupported_policy {
                UnsupportedTypePolicy::Copy => {
                    tracing::info!(key = %source.key, extension = ?extension, "unsupported file type, moving instead of optimizing");
                    self.relocate(&source, &destination, deadline).await?
                }
                UnsupportedTypePolicy::Skip => {
                    tracing::info!(key = %source.key, extension = ?extension, "unsupported file type, skipping");
                    return Ok(Outcome {
                        source,
                        destination,
                        action: Action::Skipped { extension },
                        cleanup: Cleanup::NotApplicable,
                    });
                }
                UnsupportedTypePolicy::Reject => {
                    return Err(PipelineError::Unsupported {
                        bucket: source.bucket,
                        key: source.key,
                        extension,
                    });
                }
            },
        };

        let cleanup = self.cleanup(&source, &destination, deadline).await;

        Ok(Outcome {
            source,
            destination,
            action,
            cleanup,
        })
    }

    /// 取得 → 再エンコード → 配信
    async fn optimize(
        &self,
        source: &ObjectLocation,
        destination: &ObjectLocation,
        settings: EncodeSettings,
        deadline: Deadline,
    ) -> Result<Action, PipelineError> {
        // ステージング領域はこの関数を抜けるとどの経路でも削除される
        let staging = StagingArea::prepare(self.config.staging_dir.clone())
            .await
            .map_err(|e| PipelineError::Staging(e.to_string()))?;

        tracing::info!(key = %source.key, "fetching object");
        let source_path = staging.source_path();
        let fetched = self
            .bounded(deadline, "fetch", source, self.store.download(source, &source_path))
            .await?;
        let original_bytes = match fetched {
            Ok(bytes) => bytes,
            Err(err) => return self.missing_source(source, destination, err, deadline).await,
        };

        let input = tokio::fs::read(&source_path)
            .await
            .map_err(|e| PipelineError::Staging(format!("failed to read staged source: {e}")))?;

        tracing::info!(key = %source.key, settings = ?settings, bytes = original_bytes, "transcoding image");
        let transcoded = self
            .bounded(
                deadline,
                "transcode",
                source,
                tokio::task::spawn_blocking(move || transcode(&input, settings)),
            )
            .await?
            .map_err(|e| PipelineError::Encode {
                bucket: source.bucket.clone(),
                key: source.key.clone(),
                source: TransformError::Encode(format!("transcode task failed: {e}")),
            })?
            .map_err(|e| match e {
                TransformError::Decode(_) => PipelineError::Decode {
                    bucket: source.bucket.clone(),
                    key: source.key.clone(),
                    source: e,
                },
                _ => PipelineError::Encode {
                    bucket: source.bucket.clone(),
                    key: source.key.clone(),
                    source: e,
                },
            })?;

        let output_path = staging.output_path();
        tokio::fs::write(&output_path, &transcoded.bytes)
            .await
            .map_err(|e| PipelineError::Encode {
                bucket: source.bucket.clone(),
                key: source.key.clone(),
                source: TransformError::Encode(format!("failed to write staged output: {e}")),
            })?;

        let codec = settings.codec();
        let location = self
            .bounded(
                deadline,
                "upload",
                destination,
                self.store.upload(destination, &output_path, codec.content_type()),
            )
            .await?
            .map_err(|e| PipelineError::Upload {
                bucket: destination.bucket.clone(),
                key: destination.key.clone(),
                source: e,
            })?;

        let optimized_bytes = transcoded.bytes.len() as u64;
        tracing::info!(
            location = %location,
            original_bytes,
            optimized_bytes,
            "delivered optimized image"
        );

        if let Err(e) = staging.release() {
            tracing::warn!(error = %e, "failed to remove staging area");
        }

        Ok(Action::Transcoded {
            codec,
            location,
            original_bytes,
            optimized_bytes,
            width: transcoded.width,
            height: transcoded.height,
        })
    }

    /// 非対応形式を変換せずに出力先へコピーする
    async fn relocate(
        &self,
        source: &ObjectLocation,
        destination: &ObjectLocation,
        deadline: Deadline,
    ) -> Result<Action, PipelineError> {
        if source == destination {
            tracing::info!(key = %source.key, "object is already at its destination");
            return Ok(Action::AlreadyInPlace);
        }

        let copied = self
            .bounded(deadline, "copy", destination, self.store.copy(source, destination))
            .await?;

        let err = match copied {
            Ok(()) => {
                tracing::info!(destination = %destination, "copied unsupported object");
                return Ok(Action::Copied {
                    location: destination.uri(),
                });
            }
            Err(err) => err,
        };

        if err.is_not_found() && self.already_processed(destination, deadline).await {
            tracing::info!(key = %source.key, "source already moved, nothing to do");
            return Ok(Action::AlreadyProcessed);
        }

        Err(PipelineError::Copy {
            bucket: destination.bucket.clone(),
            key: destination.key.clone(),
            source: err,
        })
    }

    /// 取得に失敗した時、再配信で既に処理済みかどうかを判定する
    async fn missing_source(
        &self,
        source: &ObjectLocation,
        destination: &ObjectLocation,
        err: StorageError,
        deadline: Deadline,
    ) -> Result<Action, PipelineError> {
        if err.is_not_found() && self.already_processed(destination, deadline).await {
            tracing::info!(key = %source.key, "source already optimized and removed, nothing to do");
            return Ok(Action::AlreadyProcessed);
        }

        Err(PipelineError::Fetch {
            bucket: source.bucket.clone(),
            key: source.key.clone(),
            source: err,
        })
    }

    /// 元オブジェクトが消えていて出力先が存在すれば処理済みとみなす
    ///
    /// 元を消すのは delete-on-success の時だけなので、それ以外では判定しない。
    async fn already_processed(&self, destination: &ObjectLocation, deadline: Deadline) -> bool {
        if !self.config.delete_on_success {
            return false;
        }

        match deadline.bound(self.store.exists(destination)).await {
            Some(Ok(exists)) => exists,
            Some(Err(e)) => {
                tracing::warn!(destination = %destination, error = %e, "could not check destination");
                false
            }
            None => false,
        }
    }

    /// 配信成功後に元オブジェクトを削除する（失敗しても呼び出しは成功）
    async fn cleanup(
        &self,
        source: &ObjectLocation,
        destination: &ObjectLocation,
        deadline: Deadline,
    ) -> Cleanup {
        if !self.config.delete_on_success {
            return Cleanup::Disabled;
        }
        if source == destination {
            tracing::warn!(key = %source.key, "not deleting source, it is also the destination");
            return Cleanup::SameLocation;
        }

        match deadline.bound(self.store.delete(source)).await {
            Some(Ok(())) => {
                tracing::info!(source = %source, "deleted source object");
                Cleanup::Deleted
            }
            Some(Err(e)) => {
                tracing::error!(source = %source, error = %e, "failed to delete source object");
                Cleanup::Failed {
                    error: e.to_string(),
                }
            }
            None => {
                tracing::error!(source = %source, "deleting source object exceeded the deadline");
                Cleanup::Failed {
                    error: "deadline exceeded".to_string(),
                }
            }
        }
    }

    async fn bounded<F: Future>(
        &self,
        deadline: Deadline,
        operation: &'static str,
        object: &ObjectLocation,
        fut: F,
    ) -> Result<F::Output, PipelineError> {
        deadline
            .bound(fut)
            .await
            .ok_or_else(|| PipelineError::Timeout {
                operation,
                bucket: object.bucket.clone(),
                key: object.key.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryObjectStore;
    use crate::transform::{JpegQuality, PngCompression};

    fn config() -> OptimizerConfig {
        OptimizerConfig::new("images", JpegQuality::new(80).unwrap(), PngCompression::Best)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let store = Arc::new(MemoryObjectStore::new());
        let config = config().with_key_marker("", "to");
        assert!(Pipeline::new(config, store.clone()).is_err());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_bucket_rejected_before_store_calls() {
        let store = Arc::new(MemoryObjectStore::new());
        let pipeline = Pipeline::new(config(), store.clone()).unwrap();

        let result = pipeline
            .process(&ObjectCreated::new("other", "from/a.jpg"), Deadline::none())
            .await;

        assert!(matches!(result, Err(PipelineError::Event(_))));
        assert!(store.calls().is_empty());
    }
}
