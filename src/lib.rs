// data_pipeline - インプロセス・パイプライン
//
// 文字列アイテムをPollerからワーカープールへチャンネル経由で受け渡し、
// 処理完了をNotifierへ通知する。ワーカーの同時実行数はパーミット
// (カウンティングセマフォ)で制限し、キャンセルとシャットダウンを
// 全コンポーネントへ一貫して伝搬する。

pub mod channel;
pub mod core;
pub mod engine;
pub mod services;

// 公開API - 主要な型を再エクスポート
pub use crate::channel::ChannelManager;
pub use crate::core::{
    CompletionSignal, DataSource, EventReporter, ItemProcessor, LifecyclePhase, PipelineConfig,
    PipelineError, PipelineResult, PipelineSummary,
};
pub use crate::engine::{
    spawn_completion_notifier, spawn_poller, spawn_sequential_worker, spawn_worker_pool, Pipeline,
};
pub use crate::services::{
    ClockDataSource, ConsoleEventReporter, DefaultPipelineConfig, FixedLatencyProcessor,
    NoOpEventReporter, QueueDataSource,
};
