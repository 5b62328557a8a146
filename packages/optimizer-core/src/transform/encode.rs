use crate::errors::TransformError;
use crate::transform::params::EncodeSettings;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{FilterType, PngEncoder};
use std::io::Cursor;

/// 画像をエンコードする
pub fn encode_image(img: &DynamicImage, settings: EncodeSettings) -> Result<Vec<u8>, TransformError> {
    let mut buf = Cursor::new(Vec::new());

    match settings {
        EncodeSettings::Jpeg { quality } => {
            // JPEG はアルファを持てないため RGB8 に変換
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value());
            img.to_rgb8()
                .write_with_encoder(encoder)
                .map_err(|e| TransformError::Encode(format!("JPEG encode failed: {e}")))?;
        }
        EncodeSettings::Png { compression } => {
            // 圧縮レベルは必ずエンコーダに渡す（既定エンコーダへの暗黙のフォールバックはしない）
            let encoder = PngEncoder::new_with_quality(&mut buf, compression.into(), FilterType::Adaptive);
            img.write_with_encoder(encoder)
                .map_err(|e| TransformError::Encode(format!("PNG encode failed: {e}")))?;
        }
    }

    Ok(buf.into_inner())
}
