use crate::errors::TransformError;
use crate::transform::params::Codec;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// 分類されたフォーマットとして画像をデコードする
///
/// 拡張子は内容を保証しないため、フォーマットを推測せず指定して読む。
/// 別フォーマットや壊れたバイト列は Decode エラーになる。
pub fn decode_image(input: &[u8], codec: Codec) -> Result<DynamicImage, TransformError> {
    ImageReader::with_format(Cursor::new(input), codec.image_format())
        .decode()
        .map_err(|e| TransformError::Decode(format!("{codec:?}: {e}")))
}

/// ヘッダのみを読んで寸法を取得する
pub fn read_dimensions(input: &[u8], codec: Codec) -> Result<(u32, u32), TransformError> {
    ImageReader::with_format(Cursor::new(input), codec.image_format())
        .into_dimensions()
        .map_err(|e| TransformError::Decode(format!("{codec:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(12, 7), Codec::Png).unwrap();
        assert_eq!(img.width(), 12);
        assert_eq!(img.height(), 7);
    }

    #[test]
    fn test_decode_rejects_mismatched_format() {
        // 拡張子は .jpg でも中身は PNG
        let result = decode_image(&png_bytes(4, 4), Codec::Jpeg);
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"not an image", Codec::Png).is_err());
        assert!(decode_image(&[], Codec::Jpeg).is_err());
    }

    #[test]
    fn test_read_dimensions() {
        assert_eq!(read_dimensions(&png_bytes(30, 20), Codec::Png).unwrap(), (30, 20));
    }
}
