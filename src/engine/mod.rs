// エンジン層 - パイプラインの各コンポーネントとオーケストレーション
// チャンネル層とサービス層を組み合わせて高レベルな処理を提供

pub mod notifier;
pub mod pipeline;
pub mod producer;
pub mod worker;

// 公開API - 主要コンポーネント
pub use notifier::spawn_completion_notifier;
pub use pipeline::Pipeline;
pub use producer::spawn_poller;
pub use worker::{spawn_sequential_worker, spawn_worker_pool};
