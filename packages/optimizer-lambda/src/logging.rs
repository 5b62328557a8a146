//! ログ初期化。

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// JSON 形式の構造化ログを初期化する
///
/// レベルは RUST_LOG で指定（未指定時は info）。
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
