// イベント報告の具象実装

use crate::core::EventReporter;
use async_trait::async_trait;

/// コンソール出力によるイベント報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleEventReporter {
    quiet: bool,
}

impl ConsoleEventReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl EventReporter for ConsoleEventReporter {
    async fn report_produced(&self, item: &str) {
        if !self.quiet {
            println!("📥 取得: {item}");
        }
    }

    async fn report_processing_started(&self, item: &str) {
        if !self.quiet {
            println!("⚙️  処理中: {item}");
        }
    }

    async fn report_processing_finished(&self, item: &str) {
        if !self.quiet {
            println!("✅ 処理完了: {item}");
        }
    }

    async fn report_completion(&self, total_completed: usize) {
        if !self.quiet {
            println!("🔔 処理完了通知を受信しました (累計: {total_completed})");
        }
    }

    async fn report_cancelled(&self, component: &str) {
        if !self.quiet {
            println!("🛑 {component}: 処理をキャンセルしました");
        }
    }

    async fn report_error(&self, component: &str, message: &str) {
        if !self.quiet {
            eprintln!("❌ {component}: エラー - {message}");
        }
    }
}

/// 何もしないイベント報告実装(テスト・ベンチマーク用)
#[derive(Debug, Default, Clone)]
pub struct NoOpEventReporter;

impl NoOpEventReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventReporter for NoOpEventReporter {
    async fn report_produced(&self, _item: &str) {
        // 何もしない
    }

    async fn report_processing_started(&self, _item: &str) {
        // 何もしない
    }

    async fn report_processing_finished(&self, _item: &str) {
        // 何もしない
    }

    async fn report_completion(&self, _total_completed: usize) {
        // 何もしない
    }

    async fn report_cancelled(&self, _component: &str) {
        // 何もしない
    }

    async fn report_error(&self, _component: &str, _message: &str) {
        // 何もしない
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_event_reporter_quiet_mode() {
        // 出力キャプチャは複雑なため、基本的な呼び出しテストのみ
        let reporter = ConsoleEventReporter::quiet();

        reporter.report_produced("データ: 1").await;
        reporter.report_processing_started("データ: 1").await;
        reporter.report_processing_finished("データ: 1").await;
        reporter.report_completion(1).await;
        reporter.report_cancelled("poller").await;
        reporter.report_error("worker", "テストエラー").await;

        // 基本的な呼び出しが成功することを確認
    }

    #[tokio::test]
    async fn test_console_event_reporter_creation() {
        let reporter1 = ConsoleEventReporter::new();
        let reporter2 = ConsoleEventReporter::quiet();

        assert!(!reporter1.quiet);
        assert!(reporter2.quiet);
    }

    #[tokio::test]
    async fn test_noop_event_reporter() {
        let reporter = NoOpEventReporter::new();

        // 全てのメソッドを呼び出してもパニックしない
        reporter.report_produced("item").await;
        reporter.report_processing_started("item").await;
        reporter.report_processing_finished("item").await;
        reporter.report_completion(10).await;
        reporter.report_cancelled("notifier").await;
        reporter.report_error("poller", "エラー").await;
    }
}
