//! `monitor` コマンド本体
//!
//! ポーリング → 結果ログ → デスクトップ通知 の順に実行する。

use tracing::info;

use super::config::Config;
use crate::notify::{NotificationContent, Notifier};
use crate::package::{max_attempts, CreationStatus, StatusPoller, StatusQuery};
use crate::progress::Progress;

/// 監視の実行単位（コラボレータは差し替え可能）
pub struct Monitor<'a> {
    config: &'a Config,
    query: &'a dyn StatusQuery,
    progress: &'a mut dyn Progress,
    notifier: &'a dyn Notifier,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: &'a Config,
        query: &'a dyn StatusQuery,
        progress: &'a mut dyn Progress,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            query,
            progress,
            notifier,
        }
    }

    /// 最新のバージョン作成リクエストが終わるまで待ち、結果を通知して返す
    pub async fn run(&mut self, timeout_secs: u64) -> CreationStatus {
        let interval_secs = self.config.poll.interval_secs;
        let max_runs = max_attempts(timeout_secs, interval_secs);
        info!(
            "Watching latest package version creation (timeout: {}s, max attempts: {})",
            timeout_secs, max_runs
        );

        let report = StatusPoller::new(self.query, &mut *self.progress)
            .with_interval(self.config.poll.interval())
            .poll(max_runs)
            .await;
        self.progress.stop(None);

        tracing::debug!(
            "Poll finished: {} after {} attempts",
            report.outcome.as_str(),
            report.attempts
        );

        let status = report.outcome.into_status();
        info!(
            "Result: {}",
            serde_json::to_string(&status).unwrap_or_else(|_| format!("{:?}", status))
        );

        if self.config.notification.enabled {
            let content = NotificationContent::for_status(&status, &self.config.notification);
            self.notifier.notify(&content);
        }

        status
    }
}
