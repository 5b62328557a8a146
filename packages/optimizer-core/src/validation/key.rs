use crate::constants::MAX_KEY_LENGTH;

/// 通知に含まれるオブジェクトキーをデコードして検証する
///
/// S3 通知のキーは form エンコード（空白は `+`）されている。
pub fn decode_notification_key(raw: &str) -> Result<String, String> {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .map_err(|_| format!("invalid URL encoding in key {raw:?}"))?
        .into_owned();

    validate_key(&decoded)?;
    Ok(decoded)
}

/// オブジェクトキーを検証する
pub fn validate_key(key: &str) -> Result<(), String> {
    // 空文字チェック
    if key.is_empty() {
        return Err("key is empty".to_string());
    }

    // 長さチェック（1024 バイトまで）
    if key.len() > MAX_KEY_LENGTH {
        return Err(format!("key is too long (max {MAX_KEY_LENGTH})"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_key() {
        assert_eq!(decode_notification_key("from/img.jpg").unwrap(), "from/img.jpg");
    }

    #[test]
    fn test_decode_encoded_key() {
        assert_eq!(
            decode_notification_key("from/my+photo%281%29.jpg").unwrap(),
            "from/my photo(1).jpg"
        );
        assert_eq!(
            decode_notification_key("from/%E5%86%99%E7%9C%9F.png").unwrap(),
            "from/写真.png"
        );
        // エンコードされた + は + のまま
        assert_eq!(decode_notification_key("a%2Bb.png").unwrap(), "a+b.png");
    }

    #[test]
    fn test_empty_key() {
        assert!(decode_notification_key("").is_err());
        assert!(validate_key("").is_err());
    }

    #[test]
    fn test_too_long_key() {
        let key = "a".repeat(MAX_KEY_LENGTH + 1);
        assert!(validate_key(&key).is_err());
        assert!(validate_key(&"a".repeat(MAX_KEY_LENGTH)).is_ok());
    }
}
