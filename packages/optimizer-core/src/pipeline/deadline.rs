use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

/// 呼び出し全体の期限
///
/// 期限を過ぎた外部呼び出しは future ごと破棄される。
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// 期限なし
    pub fn none() -> Self {
        Self(None)
    }

    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    pub fn after(duration: Duration) -> Self {
        Self::at(Instant::now() + duration)
    }

    /// エポックミリ秒の期限から `margin` を差し引いた期限を作る
    pub fn from_epoch_millis(deadline_ms: u64, margin: Duration) -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let remaining = Duration::from_millis(deadline_ms.saturating_sub(now_ms));
        Self::after(remaining.saturating_sub(margin))
    }

    /// 残り時間（期限なしは None）
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// 期限内に完了すれば Some、期限切れなら None
    pub async fn bound<F: Future>(self, fut: F) -> Option<F::Output> {
        match self.0 {
            Some(at) => tokio::time::timeout_at(at, fut).await.ok(),
            None => Some(fut.await),
        }
    }
}
