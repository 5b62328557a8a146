use crate::config::UnsupportedTypePolicy;
use crate::constants::MAX_JPEG_QUALITY;
use crate::errors::ConfigError;
use crate::transform::{JpegQuality, PngCompression};

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// JPEG 品質を検証する（0-100 の整数）
pub fn parse_jpeg_quality(var: &'static str, value: &str) -> Result<JpegQuality, ConfigError> {
    let q: i64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(var, value, "expected an integer"))?;

    u8::try_from(q)
        .ok()
        .and_then(JpegQuality::new)
        .ok_or_else(|| invalid(var, value, format!("quality must be 0-{MAX_JPEG_QUALITY}")))
}

/// PNG 圧縮レベルを検証する
pub fn parse_png_compression(var: &'static str, value: &str) -> Result<PngCompression, ConfigError> {
    PngCompression::parse(value).ok_or_else(|| {
        invalid(
            var,
            value,
            "expected default, fast, best, none or one of the codes 0, -1, -2, -3",
        )
    })
}

/// 真偽値を検証する
pub fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}

/// 非対応ファイルの扱いを検証する
pub fn parse_unsupported_policy(
    var: &'static str,
    value: &str,
) -> Result<UnsupportedTypePolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "copy" => Ok(UnsupportedTypePolicy::Copy),
        "skip" => Ok(UnsupportedTypePolicy::Skip),
        "reject" => Ok(UnsupportedTypePolicy::Reject),
        _ => Err(invalid(var, value, "expected copy, skip or reject")),
    }
}
