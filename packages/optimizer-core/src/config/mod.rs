use std::path::PathBuf;

use serde::Serialize;

use crate::errors::ConfigError;
use crate::key::KeyMarker;
use crate::transform::{FormatRegistry, JpegQuality, PngCompression};
use crate::validation::{
    parse_bool, parse_jpeg_quality, parse_png_compression, parse_unsupported_policy,
};

/// 非対応ファイルの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedTypePolicy {
    /// 変換せずに出力先へコピーする
    #[default]
    Copy,
    /// 何もしない
    Skip,
    /// 呼び出しを失敗させる
    Reject,
}

/// パイプライン設定
///
/// 起動時に一度だけ読み込み、以降は変更しない。
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub source_bucket: String,
    pub destination_bucket: String,
    pub key_marker: Option<KeyMarker>,
    pub jpeg_quality: JpegQuality,
    pub png_compression: PngCompression,
    pub delete_on_success: bool,
    pub unsupported_policy: UnsupportedTypePolicy,
    pub staging_dir: PathBuf,
}

impl OptimizerConfig {
    /// 必須項目のみで設定を作成する（出力先は同じバケット）
    pub fn new(
        source_bucket: impl Into<String>,
        jpeg_quality: JpegQuality,
        png_compression: PngCompression,
    ) -> Self {
        let source_bucket = source_bucket.into();
        Self {
            destination_bucket: source_bucket.clone(),
            source_bucket,
            key_marker: None,
            jpeg_quality,
            png_compression,
            delete_on_success: false,
            unsupported_policy: UnsupportedTypePolicy::default(),
            staging_dir: std::env::temp_dir(),
        }
    }

    pub fn with_destination_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.destination_bucket = bucket.into();
        self
    }

    pub fn with_key_marker(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.key_marker = Some(KeyMarker {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn with_delete_on_success(mut self, enabled: bool) -> Self {
        self.delete_on_success = enabled;
        self
    }

    pub fn with_unsupported_policy(mut self, policy: UnsupportedTypePolicy) -> Self {
        self.unsupported_policy = policy;
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// 環境変数から設定を読み込む
    ///
    /// 必須の環境変数:
    /// - SOURCE_BUCKET（旧名 BUCKET）
    /// - JPEG_QUALITY
    /// - PNG_COMPRESSION（旧名 PNG_QUALITY）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (_, source_bucket) = required(&lookup, &["SOURCE_BUCKET", "BUCKET"])?;
        let (var, quality) = required(&lookup, &["JPEG_QUALITY"])?;
        let jpeg_quality = parse_jpeg_quality(var, &quality)?;
        let (var, level) = required(&lookup, &["PNG_COMPRESSION", "PNG_QUALITY"])?;
        let png_compression = parse_png_compression(var, &level)?;

        let mut config = Self::new(source_bucket, jpeg_quality, png_compression);

        if let Some((_, bucket)) = optional(&lookup, &["DESTINATION_BUCKET"]) {
            config = config.with_destination_bucket(bucket);
        }

        // TO_MARKER は空文字（マーカーの削除）を許可する
        let from = lookup("FROM_MARKER").or_else(|| lookup("FROM_BUCKET"));
        let to = lookup("TO_MARKER").or_else(|| lookup("TO_BUCKET"));
        match (from, to) {
            (Some(from), Some(to)) => config = config.with_key_marker(from, to),
            (Some(_), None) => return Err(ConfigError::Missing { var: "TO_MARKER" }),
            (None, Some(_)) => return Err(ConfigError::Missing { var: "FROM_MARKER" }),
            (None, None) => {}
        }

        if let Some((var, value)) = optional(&lookup, &["DELETE_ON_SUCCESS"]) {
            config.delete_on_success = parse_bool(var, &value)?;
        }
        if let Some((var, value)) = optional(&lookup, &["UNSUPPORTED_TYPE_POLICY"]) {
            config.unsupported_policy = parse_unsupported_policy(var, &value)?;
        }
        if let Some((_, dir)) = optional(&lookup, &["STAGING_DIR"]) {
            config.staging_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// 構造上の整合性を検証する
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_bucket.trim().is_empty() {
            return Err(ConfigError::Missing {
                var: "SOURCE_BUCKET",
            });
        }
        if self.destination_bucket.trim().is_empty() {
            return Err(ConfigError::Missing {
                var: "DESTINATION_BUCKET",
            });
        }
        if let Some(marker) = &self.key_marker
            && marker.from.is_empty()
        {
            return Err(ConfigError::Invalid {
                var: "FROM_MARKER",
                value: String::new(),
                reason: "marker must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// 拡張子ごとのエンコード設定表
    pub fn format_registry(&self) -> FormatRegistry {
        FormatRegistry::new(self.jpeg_quality, self.png_compression)
    }

    /// 出力先キーを求める（マーカー未設定ならそのまま）
    pub fn destination_key(&self, key: &str) -> String {
        match &self.key_marker {
            Some(marker) => marker.apply(key),
            None => key.to_string(),
        }
    }
}

/// 空白のみの値は未設定とみなす
fn optional<F>(lookup: &F, vars: &[&'static str]) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    vars.iter().find_map(|&var| {
        lookup(var)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (var, value))
    })
}

fn required<F>(lookup: &F, vars: &[&'static str]) -> Result<(&'static str, String), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, vars).ok_or(ConfigError::Missing { var: vars[0] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        ("SOURCE_BUCKET", "images"),
        ("JPEG_QUALITY", "80"),
        ("PNG_COMPRESSION", "best"),
    ];

    #[test]
    fn test_minimal_config() {
        let config = OptimizerConfig::from_lookup(lookup_from(&BASE)).unwrap();

        assert_eq!(config.source_bucket, "images");
        assert_eq!(config.destination_bucket, "images");
        assert_eq!(config.jpeg_quality.value(), 80);
        assert_eq!(config.png_compression, PngCompression::Best);
        assert!(config.key_marker.is_none());
        assert!(!config.delete_on_success);
        assert_eq!(config.unsupported_policy, UnsupportedTypePolicy::Copy);
    }

    #[test]
    fn test_full_config() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("DESTINATION_BUCKET", "public"),
            ("FROM_MARKER", "from"),
            ("TO_MARKER", "to"),
            ("DELETE_ON_SUCCESS", "true"),
            ("UNSUPPORTED_TYPE_POLICY", "skip"),
            ("STAGING_DIR", "/var/tmp/stage"),
        ]);
        let config = OptimizerConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.destination_bucket, "public");
        assert_eq!(config.destination_key("from/a.jpg"), "to/a.jpg");
        assert!(config.delete_on_success);
        assert_eq!(config.unsupported_policy, UnsupportedTypePolicy::Skip);
        assert_eq!(config.staging_dir, PathBuf::from("/var/tmp/stage"));
    }

    #[test]
    fn test_legacy_variable_names() {
        let config = OptimizerConfig::from_lookup(lookup_from(&[
            ("BUCKET", "images"),
            ("FROM_BUCKET", "uploads"),
            ("TO_BUCKET", "optimized"),
            ("JPEG_QUALITY", "75"),
            ("PNG_QUALITY", "-3"),
        ]))
        .unwrap();

        assert_eq!(config.source_bucket, "images");
        assert_eq!(config.destination_key("uploads/x.png"), "optimized/x.png");
        assert_eq!(config.png_compression, PngCompression::Best);
    }

    #[test]
    fn test_legacy_png_no_compression_code() {
        let config = OptimizerConfig::from_lookup(lookup_from(&[
            ("BUCKET", "images"),
            ("JPEG_QUALITY", "75"),
            ("PNG_QUALITY", "-1"),
        ]))
        .unwrap();

        assert_eq!(config.png_compression, PngCompression::Uncompressed);
    }

    #[test]
    fn test_missing_jpeg_quality() {
        let err = OptimizerConfig::from_lookup(lookup_from(&[
            ("SOURCE_BUCKET", "images"),
            ("PNG_COMPRESSION", "best"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing { var: "JPEG_QUALITY" }));
    }

    #[test]
    fn test_blank_value_is_missing() {
        let err = OptimizerConfig::from_lookup(lookup_from(&[
            ("SOURCE_BUCKET", "images"),
            ("JPEG_QUALITY", "  "),
            ("PNG_COMPRESSION", "best"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing { var: "JPEG_QUALITY" }));
    }

    #[test]
    fn test_out_of_range_jpeg_quality() {
        let err = OptimizerConfig::from_lookup(lookup_from(&[
            ("SOURCE_BUCKET", "images"),
            ("JPEG_QUALITY", "150"),
            ("PNG_COMPRESSION", "best"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { var: "JPEG_QUALITY", .. }));
    }

    #[test]
    fn test_missing_png_compression() {
        let err = OptimizerConfig::from_lookup(lookup_from(&[
            ("SOURCE_BUCKET", "images"),
            ("JPEG_QUALITY", "80"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing { var: "PNG_COMPRESSION" }));
    }

    #[test]
    fn test_half_marker_pair() {
        let mut pairs = BASE.to_vec();
        pairs.push(("FROM_MARKER", "from"));
        let err = OptimizerConfig::from_lookup(lookup_from(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Missing { var: "TO_MARKER" }));
    }

    #[test]
    fn test_empty_to_marker_strips_prefix() {
        let mut pairs = BASE.to_vec();
        pairs.extend([("FROM_MARKER", "incoming/"), ("TO_MARKER", "")]);
        let config = OptimizerConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.destination_key("incoming/a.jpg"), "a.jpg");
    }

    #[test]
    fn test_empty_from_marker_is_invalid() {
        let mut pairs = BASE.to_vec();
        pairs.extend([("FROM_MARKER", ""), ("TO_MARKER", "to")]);
        let err = OptimizerConfig::from_lookup(lookup_from(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { var: "FROM_MARKER", .. }));
    }

    #[test]
    fn test_invalid_delete_flag() {
        let mut pairs = BASE.to_vec();
        pairs.push(("DELETE_ON_SUCCESS", "sometimes"));
        assert!(OptimizerConfig::from_lookup(lookup_from(&pairs)).is_err());
    }
}
