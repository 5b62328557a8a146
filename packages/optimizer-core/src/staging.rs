//! 1 回の呼び出し専用の一時領域。
//!
//! 取得した元画像と再エンコード結果をファイルとして置く。
//! `StagingArea` が破棄されると、成功・失敗どちらの経路でもディレクトリごと削除される。

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::constants::STAGING_PREFIX;

const SOURCE_FILE: &str = "source";
const OUTPUT_FILE: &str = "output";

#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// `root` の下に専用ディレクトリを作成する
    pub fn create(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    /// `create` をブロッキング用スレッドで実行する
    pub async fn prepare(root: PathBuf) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::create(&root))
            .await
            .map_err(io::Error::other)?
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 取得した元オブジェクトの置き場所
    pub fn source_path(&self) -> PathBuf {
        self.dir.path().join(SOURCE_FILE)
    }

    /// 再エンコード結果の置き場所
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_FILE)
    }

    /// 明示的に削除し、削除失敗を呼び出し元に返す
    pub fn release(self) -> io::Result<()> {
        self.dir.close()
    }
}
