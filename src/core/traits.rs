// パイプラインのトレイト定義
// 全ての抽象化インターフェースを定義

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// パイプラインの設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// 同時処理数を制限するパーミット数を取得
    fn permit_count(&self) -> usize;

    /// データ取得の間隔を取得
    fn poll_interval(&self) -> Duration;

    /// 1アイテムあたりのシミュレート処理時間を取得
    fn processing_latency(&self) -> Duration;
}

// PipelineConfig for Box<dyn PipelineConfig>
impl PipelineConfig for Box<dyn PipelineConfig> {
    fn permit_count(&self) -> usize {
        self.as_ref().permit_count()
    }

    fn poll_interval(&self) -> Duration {
        self.as_ref().poll_interval()
    }

    fn processing_latency(&self) -> Duration {
        self.as_ref().processing_latency()
    }
}

/// データ取得元の抽象化トレイト
///
/// 外部データソース(DB等)からの取得を抽象化する。
/// `Ok(None)` は「データなし」を意味し、エラーではない。
#[automock]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// 1件のアイテムを取得
    async fn fetch(&self) -> Result<Option<String>>;
}

// DataSource for Box<dyn DataSource>
#[async_trait]
impl DataSource for Box<dyn DataSource> {
    async fn fetch(&self) -> Result<Option<String>> {
        self.as_ref().fetch().await
    }
}

/// 1アイテムのドメイン処理を抽象化するトレイト
///
/// 失敗はそのアイテムに限定され、パイプライン全体を止めない。
#[automock]
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    /// 1アイテムを処理
    async fn process(&self, item: &str) -> Result<()>;
}

// ItemProcessor for Box<dyn ItemProcessor>
#[async_trait]
impl ItemProcessor for Box<dyn ItemProcessor> {
    async fn process(&self, item: &str) -> Result<()> {
        self.as_ref().process(item).await
    }
}

/// イベント報告の抽象化トレイト
///
/// コンソール等の外部コラボレーターへ状態を通知する。
/// 文言自体は契約の一部ではなく、各イベントが観測可能であることのみを保証する。
#[automock]
#[async_trait]
pub trait EventReporter: Send + Sync {
    /// アイテム生成時の報告
    async fn report_produced(&self, item: &str);

    /// アイテム処理開始時の報告
    async fn report_processing_started(&self, item: &str);

    /// アイテム処理完了時の報告
    async fn report_processing_finished(&self, item: &str);

    /// 完了通知受信時の報告
    async fn report_completion(&self, total_completed: usize);

    /// キャンセル観測時の報告
    async fn report_cancelled(&self, component: &str);

    /// エラー発生時の報告
    async fn report_error(&self, component: &str, message: &str);
}

// EventReporter for Box<dyn EventReporter>
#[async_trait]
impl EventReporter for Box<dyn EventReporter> {
    async fn report_produced(&self, item: &str) {
        self.as_ref().report_produced(item).await
    }

    async fn report_processing_started(&self, item: &str) {
        self.as_ref().report_processing_started(item).await
    }

    async fn report_processing_finished(&self, item: &str) {
        self.as_ref().report_processing_finished(item).await
    }

    async fn report_completion(&self, total_completed: usize) {
        self.as_ref().report_completion(total_completed).await
    }

    async fn report_cancelled(&self, component: &str) {
        self.as_ref().report_cancelled(component).await
    }

    async fn report_error(&self, component: &str, message: &str) {
        self.as_ref().report_error(component, message).await
    }
}
