use thiserror::Error;

/// 設定読み込みエラー（起動時に致命的）
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set")]
    Missing { var: &'static str },

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// オブジェクトストアへのアクセスエラー
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("bucket does not exist: {bucket}")]
    BucketNotFound { bucket: String },

    #[error("access denied: {bucket}/{key}")]
    Forbidden { bucket: String, key: String },

    #[error("local I/O error: {0}")]
    Io(String),

    #[error("storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// オブジェクトが存在しないことを示すエラーかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// 画像変換エラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("dimensions changed during transcode ({expected:?} -> {actual:?})")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// 1 回の呼び出しを中断させるエラー
///
/// 外部呼び出しの失敗は bucket / key を必ず保持し、再実行せずに原因を追えるようにする。
/// 元オブジェクトの削除失敗はここに含めない（配信済みのため呼び出しは成功扱い）。
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid notification: {0}")]
    Event(String),

    #[error("unsupported file type {extension:?} for {bucket}/{key}")]
    Unsupported {
        bucket: String,
        key: String,
        extension: Option<String>,
    },

    #[error("failed to prepare staging area: {0}")]
    Staging(String),

    #[error("failed to fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to decode {bucket}/{key}: {source}")]
    Decode {
        bucket: String,
        key: String,
        #[source]
        source: TransformError,
    },

    #[error("failed to encode {bucket}/{key}: {source}")]
    Encode {
        bucket: String,
        key: String,
        #[source]
        source: TransformError,
    },

    #[error("failed to upload {bucket}/{key}: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to copy to {bucket}/{key}: {source}")]
    Copy {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("{operation} on {bucket}/{key} exceeded the invocation deadline")]
    Timeout {
        operation: &'static str,
        bucket: String,
        key: String,
    },
}
