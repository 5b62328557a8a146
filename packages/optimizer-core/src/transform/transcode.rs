use crate::errors::TransformError;
use crate::transform::decode::{decode_image, read_dimensions};
use crate::transform::encode::encode_image;
use crate::transform::params::EncodeSettings;

/// 再エンコード結果
#[derive(Debug)]
pub struct Transcoded {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// 画像バイト列をデコードし、設定に従って再エンコードする
///
/// リサイズは行わない。出力ヘッダの寸法が入力と一致しなければエラー。
pub fn transcode(input: &[u8], settings: EncodeSettings) -> Result<Transcoded, TransformError> {
    let codec = settings.codec();
    let img = decode_image(input, codec)?;
    let (width, height) = (img.width(), img.height());

    let bytes = encode_image(&img, settings)?;

    let actual = read_dimensions(&bytes, codec)
        .map_err(|e| TransformError::Encode(format!("encoded output is unreadable: {e}")))?;
    if actual != (width, height) {
        return Err(TransformError::DimensionMismatch {
            expected: (width, height),
            actual,
        });
    }

    Ok(Transcoded {
        bytes,
        width,
        height,
    })
}
