/// キー中の置換マーカー（例: `originals/` → `optimized/`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMarker {
    pub from: String,
    pub to: String,
}

impl KeyMarker {
    /// マーカーを適用して出力先キーを求める
    pub fn apply(&self, key: &str) -> String {
        derive_destination_key(key, &self.from, &self.to)
    }
}

/// `from` の最初の出現箇所だけを `to` に置き換える
///
/// `from` が含まれない場合はキーをそのまま返す。
pub fn derive_destination_key(key: &str, from: &str, to: &str) -> String {
    key.replacen(from, to, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_replaces_marker() {
        assert_eq!(derive_destination_key("from/img.jpg", "from", "to"), "to/img.jpg");
    }

    #[test]
    fn test_derive_replaces_first_occurrence_only() {
        assert_eq!(
            derive_destination_key("from/from/from.png", "from", "to"),
            "to/from/from.png"
        );
        assert_eq!(
            derive_destination_key("a/raw/b/raw/c.jpg", "raw", "web"),
            "a/web/b/raw/c.jpg"
        );
    }

    #[test]
    fn test_derive_without_marker_is_identity() {
        assert_eq!(derive_destination_key("other/img.jpg", "from", "to"), "other/img.jpg");
        assert_eq!(derive_destination_key("", "from", "to"), "");
    }

    #[test]
    fn test_derive_is_case_sensitive() {
        assert_eq!(derive_destination_key("From/img.jpg", "from", "to"), "From/img.jpg");
    }

    #[test]
    fn test_marker_apply() {
        let marker = KeyMarker {
            from: "uploads/".to_string(),
            to: "public/".to_string(),
        };
        assert_eq!(marker.apply("uploads/2024/a.png"), "public/2024/a.png");
    }
}
