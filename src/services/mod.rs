// サービス層 - 各トレイトの具象実装
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod monitoring;
pub mod processing;
pub mod source;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::DefaultPipelineConfig;
pub use monitoring::{ConsoleEventReporter, NoOpEventReporter};
pub use processing::FixedLatencyProcessor;
pub use source::{ClockDataSource, QueueDataSource};
