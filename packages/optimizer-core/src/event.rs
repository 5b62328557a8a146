//! S3 通知から 1 件の作成イベントを取り出す。

use aws_lambda_events::event::s3::S3Event;

use crate::errors::PipelineError;
use crate::storage::ObjectLocation;
use crate::validation::decode_notification_key;

/// 新しく作成された 1 つのオブジェクト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreated {
    pub bucket: String,
    pub key: String,
    pub size: Option<u64>,
}

impl ObjectCreated {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size: None,
        }
    }

    pub fn location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, &self.key)
    }

    /// S3 通知を変換する
    ///
    /// 1 回の呼び出しで処理するのは 1 件のみ。空の通知や複数レコードは黙って切り捨てずに拒否する。
    pub fn from_s3_event(event: &S3Event) -> Result<Self, PipelineError> {
        let record = match event.records.as_slice() {
            [record] => record,
            [] => return Err(PipelineError::Event("notification has no records".to_string())),
            records => {
                return Err(PipelineError::Event(format!(
                    "notification has {} records, expected exactly 1",
                    records.len()
                )));
            }
        };

        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| PipelineError::Event("record has no bucket name".to_string()))?;

        let raw_key = record
            .s3
            .object
            .key
            .as_deref()
            .ok_or_else(|| PipelineError::Event("record has no object key".to_string()))?;
        let key = decode_notification_key(raw_key).map_err(PipelineError::Event)?;

        let size = record.s3.object.size.and_then(|s| u64::try_from(s).ok());

        Ok(Self { bucket, key, size })
    }
}
