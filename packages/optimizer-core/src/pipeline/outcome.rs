use serde::Serialize;

use crate::storage::ObjectLocation;
use crate::transform::Codec;

/// 配信段階で行ったこと
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// 再エンコードして配信した
    Transcoded {
        codec: Codec,
        location: String,
        original_bytes: u64,
        optimized_bytes: u64,
        width: u32,
        height: u32,
    },
    /// 非対応形式をそのままコピーした
    Copied { location: String },
    /// 非対応形式で、出力先が元と同じ位置のため何もしなかった
    AlreadyInPlace,
    /// 非対応形式をポリシーにより無視した
    Skipped { extension: Option<String> },
    /// 元オブジェクトは既に無く、出力先が存在する（再配信）
    AlreadyProcessed,
}

/// 元オブジェクトの削除結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cleanup {
    Deleted,
    /// delete-on-success が無効
    Disabled,
    /// 何も配信していない
    NotApplicable,
    /// 出力先が元オブジェクトと同じ位置のため削除しない
    SameLocation,
    /// 削除に失敗した（配信済みのため呼び出しは成功）
    Failed { error: String },
}

/// 1 回の呼び出しの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub source: ObjectLocation,
    pub destination: ObjectLocation,
    pub action: Action,
    pub cleanup: Cleanup,
}

impl Outcome {
    /// 配信先の位置識別子
    pub fn location(&self) -> Option<&str> {
        match &self.action {
            Action::Transcoded { location, .. } | Action::Copied { location } => Some(location),
            _ => None,
        }
    }
}
