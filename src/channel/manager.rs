// ChannelManager - ワーク/完了チャンネルのライフサイクル管理

use crate::core::types::{CompletionSignal, LifecyclePhase};
use crate::core::{PipelineError, PipelineResult};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// ワークチャンネルと完了チャンネルの生成とクローズを一元管理する
///
/// チャンネルは構築時に生成され、`stop()` で書き込み側から順に閉じられる。
/// クローズ済みチャンネルに残っているアイテムは破棄されず、
/// 読み手がドレインし終えた後に終端(`recv() -> None`)を観測する。
pub struct ChannelManager {
    work_tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
    work_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    completion_tx: Mutex<Option<mpsc::UnboundedSender<CompletionSignal>>>,
    completion_rx: Mutex<Option<mpsc::UnboundedReceiver<CompletionSignal>>>,
    phase: Mutex<LifecyclePhase>,
    cancel: CancellationToken,
}

impl ChannelManager {
    /// 両チャンネルとキャンセルトークンを生成
    pub fn new() -> Self {
        let (work_tx, work_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            work_tx: Mutex::new(Some(work_tx)),
            work_rx: Mutex::new(Some(work_rx)),
            completion_tx: Mutex::new(Some(completion_tx)),
            completion_rx: Mutex::new(Some(completion_rx)),
            phase: Mutex::new(LifecyclePhase::Idle),
            cancel: CancellationToken::new(),
        }
    }

    /// ワークチャンネルの送信側クローンを取得
    pub fn work_sender(&self) -> PipelineResult<mpsc::UnboundedSender<String>> {
        self.lock(&self.work_tx)
            .clone()
            .ok_or_else(|| PipelineError::channel_closed("work-channel"))
    }

    /// 完了チャンネルの送信側クローンを取得
    pub fn completion_sender(&self) -> PipelineResult<mpsc::UnboundedSender<CompletionSignal>> {
        self.lock(&self.completion_tx)
            .clone()
            .ok_or_else(|| PipelineError::channel_closed("completion-channel"))
    }

    /// ワークチャンネルの受信側を取り出す(1回限り)
    pub fn take_work_receiver(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.lock(&self.work_rx).take()
    }

    /// 完了チャンネルの受信側を取り出す(1回限り)
    pub fn take_completion_receiver(&self) -> Option<mpsc::UnboundedReceiver<CompletionSignal>> {
        self.lock(&self.completion_rx).take()
    }

    /// 全コンポーネントへ配布するキャンセルトークンを取得
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 現在のライフサイクル段階を取得
    pub fn phase(&self) -> LifecyclePhase {
        *self.lock(&self.phase)
    }

    /// Runningへ遷移する。チャンネルは構築時に生成済みのため、それ以外の副作用はない
    pub fn start(&self) {
        let mut phase = self.lock(&self.phase);
        if *phase == LifecyclePhase::Idle {
            *phase = LifecyclePhase::Running;
        }
    }

    /// Drainingへ遷移し、キャンセルを全コンポーネントへ通知する
    ///
    /// 新規アイテムの受け付けを止めるだけで、チャンネルはまだ閉じない。
    pub fn begin_drain(&self) {
        {
            let mut phase = self.lock(&self.phase);
            if *phase == LifecyclePhase::Running || *phase == LifecyclePhase::Idle {
                *phase = LifecyclePhase::Draining;
            }
        }
        self.cancel.cancel();
    }

    /// Closedへ遷移し、ワークチャンネル、完了チャンネルの順に書き込み側を閉じる
    ///
    /// 冪等であり、既に閉じられたチャンネルに対して呼ばれても何もしない。
    /// 保持している送信側を手放すことでクローズが成立する。コンポーネントが
    /// 持つクローンはキャンセルによる各ループの終了時に手放される。
    pub fn stop(&self) {
        self.cancel.cancel();

        // ワークチャンネルを先に閉じる
        self.lock(&self.work_tx).take();
        // 次に完了チャンネルを閉じる
        self.lock(&self.completion_tx).take();

        *self.lock(&self.phase) = LifecyclePhase::Closed;
    }

    // ポイズニングされたロックは直前の値をそのまま引き継ぐ
    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new()
    }
}
