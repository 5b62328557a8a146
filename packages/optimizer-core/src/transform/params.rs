use crate::constants::MAX_JPEG_QUALITY;
use image::ImageFormat;
use image::codecs::png::CompressionType;
use serde::Serialize;

/// 再エンコードに対応するコーデック
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    Jpeg,
    Png,
}

impl Codec {
    /// 拡張子（ドットなし）から Codec を作成する
    ///
    /// 大文字小文字は区別しない（`photo.JPG` も JPEG とみなす）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// デコード時に強制する image クレートのフォーマット
    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// JPEG 品質（0-100）
///
/// 範囲外の値は作成できない。0 はエンコーダ側で最低品質 1 として扱われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_JPEG_QUALITY).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// PNG 圧縮レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Default,
    Fast,
    Best,
    Uncompressed,
}

impl PngCompression {
    /// 名前または数値コードから PngCompression を作成
    ///
    /// 数値コードは既存デプロイの `PNG_QUALITY` 値
    /// （0 = default, -1 = no compression, -2 = best speed, -3 = best compression）。
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "0" => Some(Self::Default),
            "fast" | "best-speed" | "-2" => Some(Self::Fast),
            "best" | "best-compression" | "-3" => Some(Self::Best),
            "none" | "uncompressed" | "-1" => Some(Self::Uncompressed),
            _ => None,
        }
    }
}

impl From<PngCompression> for CompressionType {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Default => CompressionType::Default,
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Best => CompressionType::Best,
            PngCompression::Uncompressed => CompressionType::Uncompressed,
        }
    }
}

/// コーデックごとのエンコード設定
///
/// 品質パラメータは必ずコーデックと一緒に選ばれる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "codec", rename_all = "lowercase")]
pub enum EncodeSettings {
    Jpeg { quality: JpegQuality },
    Png { compression: PngCompression },
}

impl EncodeSettings {
    pub fn codec(&self) -> Codec {
        match self {
            Self::Jpeg { .. } => Codec::Jpeg,
            Self::Png { .. } => Codec::Png,
        }
    }
}
