// Pipeline - 完全依存性注入によるオーケストレーション
// ChannelManagerと3コンポーネント(Poller/Worker Pool/Notifier)を束ねる

use super::notifier::spawn_completion_notifier;
use super::producer::spawn_poller;
use super::worker::spawn_worker_pool;
use crate::channel::ChannelManager;
use crate::core::{
    DataSource, EventReporter, ItemProcessor, LifecyclePhase, PipelineConfig, PipelineError,
    PipelineResult, PipelineSummary,
};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

struct ComponentHandles {
    poller: tokio::task::JoinHandle<Result<()>>,
    worker_pool: tokio::task::JoinHandle<Result<()>>,
    notifier: tokio::task::JoinHandle<Result<()>>,
}

/// パイプライン本体
///
/// 全ての依存関係をコンストラクタで注入する(Constructor Injection)。
/// チャンネルは先に生成し、各コンポーネントへ参照を明示的に渡す設計で、
/// グローバルな状態やサービスロケーターには依存しない。
pub struct Pipeline<S, P, C, R> {
    source: Arc<S>,
    processor: Arc<P>,
    config: Arc<C>,
    reporter: Arc<R>,
    manager: ChannelManager,
    produced_count: Arc<AtomicUsize>,
    processed_count: Arc<AtomicUsize>,
    failed_count: Arc<AtomicUsize>,
    completed_count: Arc<AtomicUsize>,
    handles: Option<ComponentHandles>,
    started_at: Option<Instant>,
}

impl<S, P, C, R> Pipeline<S, P, C, R>
where
    S: DataSource + 'static,
    P: ItemProcessor + 'static,
    C: PipelineConfig,
    R: EventReporter + 'static,
{
    /// 新しいパイプラインを作成
    pub fn new(source: S, processor: P, config: C, reporter: R) -> Self {
        Self {
            source: Arc::new(source),
            processor: Arc::new(processor),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            manager: ChannelManager::new(),
            produced_count: Arc::new(AtomicUsize::new(0)),
            processed_count: Arc::new(AtomicUsize::new(0)),
            failed_count: Arc::new(AtomicUsize::new(0)),
            completed_count: Arc::new(AtomicUsize::new(0)),
            handles: None,
            started_at: None,
        }
    }

    /// 設定を取得
    pub fn config(&self) -> &C {
        self.config.as_ref()
    }

    /// 現在のライフサイクル段階を取得
    pub fn phase(&self) -> LifecyclePhase {
        self.manager.phase()
    }

    /// パイプラインを開始する
    ///
    /// チャンネルの受信側を取り出し、Poller・Worker Pool・Notifierを起動する。
    /// 2重開始は設定エラーとして拒否する。
    pub fn start(&mut self) -> PipelineResult<()> {
        if self.handles.is_some() {
            return Err(PipelineError::configuration(
                "パイプラインは既に開始されています",
            ));
        }

        if self.config.permit_count() == 0 {
            return Err(PipelineError::configuration(
                "パーミット数は1以上である必要があります",
            ));
        }

        let work_rx = self
            .manager
            .take_work_receiver()
            .ok_or_else(|| PipelineError::configuration("ワークチャンネルは取得済みです"))?;
        let completion_rx = self
            .manager
            .take_completion_receiver()
            .ok_or_else(|| PipelineError::configuration("完了チャンネルは取得済みです"))?;
        let work_tx = self.manager.work_sender()?;
        let completion_tx = self.manager.completion_sender()?;
        let cancel = self.manager.cancellation_token();

        let permits = Arc::new(Semaphore::new(self.config.permit_count()));

        let poller = spawn_poller(
            Arc::clone(&self.source),
            work_tx,
            self.config.poll_interval(),
            Arc::clone(&self.produced_count),
            Arc::clone(&self.reporter),
            cancel.clone(),
        );

        let worker_pool = spawn_worker_pool(
            Arc::clone(&self.processor),
            work_rx,
            completion_tx,
            permits,
            Arc::clone(&self.processed_count),
            Arc::clone(&self.failed_count),
            Arc::clone(&self.reporter),
            cancel.clone(),
        );

        let notifier = spawn_completion_notifier(
            completion_rx,
            Arc::clone(&self.completed_count),
            Arc::clone(&self.reporter),
            cancel,
        );

        self.handles = Some(ComponentHandles {
            poller,
            worker_pool,
            notifier,
        });
        self.started_at = Some(Instant::now());
        self.manager.start();

        Ok(())
    }

    /// パイプラインを停止する
    ///
    /// Drainingへ遷移してキャンセルを通知し、ワークチャンネル、
    /// 完了チャンネルの順に閉じた後、全コンポーネントの終了を待つ。
    /// ワーカープールは実行中の処理を待ち切ってから終了する(ベストエフォートのドレイン)。
    /// チャンネルクローズは冪等であり、2回目以降の呼び出しも安全。
    pub async fn stop(&mut self) -> PipelineResult<PipelineSummary> {
        self.manager.begin_drain();
        self.manager.stop();

        if let Some(handles) = self.handles.take() {
            handles.poller.await.map_err(PipelineError::task)??;
            handles.worker_pool.await.map_err(PipelineError::task)??;
            handles.notifier.await.map_err(PipelineError::task)??;
        }

        Ok(self.summary())
    }

    /// 指定時間だけ実行してから停止する(デモ・テスト用の高レベルAPI)
    pub async fn run_for(&mut self, duration: Duration) -> PipelineResult<PipelineSummary> {
        self.start()?;
        tokio::time::sleep(duration).await;
        self.stop().await
    }

    /// 現時点のサマリーを取得
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            produced_items: self.produced_count.load(Ordering::Relaxed),
            processed_items: self.processed_count.load(Ordering::Relaxed),
            failed_items: self.failed_count.load(Ordering::Relaxed),
            completion_signals: self.completed_count.load(Ordering::Relaxed),
            total_running_time_ms: self
                .started_at
                .map(|t| t.elapsed().as_millis() as u64)
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config::DefaultPipelineConfig;
    use crate::services::monitoring::NoOpEventReporter;
    use crate::services::processing::FixedLatencyProcessor;
    use crate::services::source::QueueDataSource;
    use tokio::time::{timeout, Duration};

    fn test_pipeline(
        items: Vec<String>,
        config: DefaultPipelineConfig,
    ) -> Pipeline<QueueDataSource, FixedLatencyProcessor, DefaultPipelineConfig, NoOpEventReporter>
    {
        let latency = config.processing_latency();
        Pipeline::new(
            QueueDataSource::new(items),
            FixedLatencyProcessor::new(latency),
            config,
            NoOpEventReporter::new(),
        )
    }

    #[tokio::test]
    async fn test_pipeline_rejects_double_start() {
        let mut pipeline = test_pipeline(vec![], DefaultPipelineConfig::default());

        pipeline.start().unwrap();
        let second = pipeline.start();
        assert!(matches!(second, Err(PipelineError::Configuration { .. })));

        pipeline.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_pipeline_rejects_zero_permits() {
        let config = DefaultPipelineConfig::default().with_permit_count(0);
        let mut pipeline = test_pipeline(vec![], config);

        let result = pipeline.start();
        assert!(matches!(result, Err(PipelineError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_pipeline_phase_transitions() {
        let mut pipeline = test_pipeline(vec![], DefaultPipelineConfig::default());
        assert_eq!(pipeline.phase(), LifecyclePhase::Idle);

        pipeline.start().unwrap();
        assert_eq!(pipeline.phase(), LifecyclePhase::Running);

        pipeline.stop().await.unwrap();
        assert_eq!(pipeline.phase(), LifecyclePhase::Closed);
    }

    #[tokio::test]
    async fn test_pipeline_processes_items_end_to_end() {
        let items: Vec<String> = (0..3).map(|i| format!("item-{i}")).collect();
        let config = DefaultPipelineConfig::default()
            .with_permit_count(2)
            .with_poll_interval(Duration::from_millis(5))
            .with_processing_latency(Duration::from_millis(10));

        let mut pipeline = test_pipeline(items, config);
        let summary = pipeline.run_for(Duration::from_millis(500)).await.unwrap();

        assert_eq!(summary.produced_items, 3);
        assert_eq!(summary.processed_items, 3);
        assert_eq!(summary.failed_items, 0);
        assert_eq!(summary.completion_signals, 3);
        assert!(summary.total_running_time_ms > 0);
    }

    #[tokio::test]
    async fn test_pipeline_stop_is_prompt_and_repeatable() {
        let config = DefaultPipelineConfig::default()
            .with_poll_interval(Duration::from_secs(60)); // 取得待ちのまま止める
        let mut pipeline = test_pipeline(vec!["残留".to_string()], config);

        pipeline.start().unwrap();

        // 待機中でもキャンセルで速やかに停止する
        let summary = timeout(Duration::from_secs(2), pipeline.stop())
            .await
            .expect("停止がブロックしてはいけない")
            .unwrap();
        assert_eq!(summary.produced_items, 0);

        // 2回目のstopも安全(チャンネルクローズは冪等)
        let again = pipeline.stop().await.unwrap();
        assert_eq!(again.produced_items, 0);
    }

    #[tokio::test]
    async fn test_pipeline_stop_without_start_is_silent() {
        let mut pipeline = test_pipeline(vec![], DefaultPipelineConfig::default());

        // 未開始のstopは防御的に成功する
        let summary = pipeline.stop().await.unwrap();
        assert_eq!(summary.produced_items, 0);
        assert_eq!(summary.total_running_time_ms, 0);
    }
}
