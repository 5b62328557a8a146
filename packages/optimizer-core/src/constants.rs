use std::time::Duration;

/// オブジェクトキーの最大長（S3 の上限と同じ 1024 バイト）
pub const MAX_KEY_LENGTH: usize = 1024;

/// ステージング領域のディレクトリ名プレフィックス
pub const STAGING_PREFIX: &str = "optimizer-";

/// ランタイムの期限から差し引く余裕時間（失敗をログに残すため）
pub const DEADLINE_SAFETY_MARGIN: Duration = Duration::from_millis(500);

/// JPEG 品質の上限
pub const MAX_JPEG_QUALITY: u8 = 100;
