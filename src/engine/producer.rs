// Poller - 一定間隔でのアイテム生成機能

use crate::core::{DataSource, EventReporter};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Poller: データソースから一定間隔でアイテムを取得し、ワークチャンネルへ配信
///
/// 取得エラーはそのサイクル限りで報告して次の間隔へ進む。
/// 送信失敗(チャンネルクローズ)はループの終了条件であり、リトライしない。
pub fn spawn_poller<S, R>(
    source: Arc<S>,
    work_tx: tokio::sync::mpsc::UnboundedSender<String>,
    poll_interval: Duration,
    produced_count: Arc<AtomicUsize>,
    reporter: Arc<R>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>>
where
    S: DataSource + 'static,
    R: EventReporter + 'static,
{
    tokio::spawn(async move {
        loop {
            // キャンセルか間隔経過のどちらかを待つ
            tokio::select! {
                _ = cancel.cancelled() => {
                    reporter.report_cancelled("poller").await;
                    break;
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }

            let item = match source.fetch().await {
                Ok(Some(item)) => item,
                Ok(None) => continue, // データなし
                Err(error) => {
                    reporter
                        .report_error("poller", &format!("データ取得エラー: {error}"))
                        .await;
                    continue;
                }
            };

            if work_tx.send(item.clone()).is_err() {
                // シャットダウンと取得が競合した場合。非致命だがループは即終了
                reporter
                    .report_error("poller", "ワークチャンネルは既に閉じられています")
                    .await;
                break;
            }

            produced_count.fetch_add(1, Ordering::Relaxed);
            reporter.report_produced(&item).await;
        }
        Ok(())
    })
}
