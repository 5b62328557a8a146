use crate::transform::params::{Codec, EncodeSettings, JpegQuality, PngCompression};

/// キーの最後のセグメントから拡張子（ドットなし）を取り出す
///
/// ドットがない、または末尾がドットの場合は None
pub fn extension_of(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next().unwrap_or(key);
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// 分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Supported(EncodeSettings),
    Unsupported { extension: Option<String> },
}

/// 対応拡張子とエンコード設定の対応表
///
/// 起動時に設定から作成し、以降は読み取り専用。
#[derive(Debug, Clone, Copy)]
pub struct FormatRegistry {
    jpeg_quality: JpegQuality,
    png_compression: PngCompression,
}

impl FormatRegistry {
    pub fn new(jpeg_quality: JpegQuality, png_compression: PngCompression) -> Self {
        Self {
            jpeg_quality,
            png_compression,
        }
    }

    /// 拡張子を分類する
    pub fn classify(&self, extension: Option<&str>) -> Classification {
        match extension.and_then(Codec::from_extension) {
            Some(Codec::Jpeg) => Classification::Supported(EncodeSettings::Jpeg {
                quality: self.jpeg_quality,
            }),
            Some(Codec::Png) => Classification::Supported(EncodeSettings::Png {
                compression: self.png_compression,
            }),
            None => Classification::Unsupported {
                extension: extension.map(str::to_string),
            },
        }
    }

    /// キーから拡張子を取り出して分類する
    pub fn classify_key(&self, key: &str) -> Classification {
        self.classify(extension_of(key))
    }
}
