// パイプラインに関連するデータ型定義

/// 完了通知シグナル
///
/// 1アイテムの処理が終わったことを示すペイロードなしのトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionSignal;

/// パイプライン全体のライフサイクル段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// 構築済みだが未開始
    Idle,
    /// プロデューサーとワーカーが稼働中
    Running,
    /// シャットダウン要求済み。新規アイテムは受け付けず、実行中の処理のみ完了させる
    Draining,
    /// 両チャンネルが閉じられ、以降の操作は無効
    Closed,
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineSummary {
    pub produced_items: usize,
    pub processed_items: usize,
    pub failed_items: usize,
    pub completion_signals: usize,
    pub total_running_time_ms: u64,
}
