// Worker Pool - パーミットで同時実行数を制限した並列処理機能

use crate::core::types::CompletionSignal;
use crate::core::{EventReporter, ItemProcessor};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Worker Pool: ワークチャンネルをドレインし、パーミット上限内で並列処理する
///
/// ディスパッチループはパーミット取得 → デキュー → 独立タスク起動の順で進む。
/// パーミット取得が全処理数の上限(スロットル)であり、取得待ちの間に
/// キャンセルが要求された場合はパーミットをリークせずに終了する。
/// 起動した処理タスクはJoinSetで追跡し、ループ終了後に全て待ち切る。
pub fn spawn_worker_pool<P, R>(
    processor: Arc<P>,
    mut work_rx: mpsc::UnboundedReceiver<String>,
    completion_tx: mpsc::UnboundedSender<CompletionSignal>,
    permits: Arc<Semaphore>,
    processed_count: Arc<AtomicUsize>,
    failed_count: Arc<AtomicUsize>,
    reporter: Arc<R>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>>
where
    P: ItemProcessor + 'static,
    R: EventReporter + 'static,
{
    tokio::spawn(async move {
        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            // パーミット取得(スロットル)。キャンセルとの競合はリークしない
            let permit = tokio::select! {
                _ = cancel.cancelled() => {
                    reporter.report_cancelled("worker-pool").await;
                    break;
                }
                acquired = Arc::clone(&permits).acquire_owned() => match acquired {
                    Ok(permit) => permit,
                    Err(_) => break, // セマフォが閉じられた
                }
            };

            // パーミットを保持した状態で次のアイテムをデキュー
            let item = tokio::select! {
                _ = cancel.cancelled() => {
                    drop(permit);
                    reporter.report_cancelled("worker-pool").await;
                    break;
                }
                received = work_rx.recv() => match received {
                    Some(item) => item,
                    None => {
                        // チャンネルがクローズされドレイン済み
                        drop(permit);
                        break;
                    }
                }
            };

            // 処理を独立タスクとして起動。ディスパッチループは次の周回へ進める
            in_flight.spawn(process_item(
                item,
                permit,
                Arc::clone(&processor),
                completion_tx.clone(),
                Arc::clone(&processed_count),
                Arc::clone(&failed_count),
                Arc::clone(&reporter),
                cancel.clone(),
            ));

            // 終了済みタスクを回収
            while let Some(joined) = in_flight.try_join_next() {
                if let Err(error) = joined {
                    reporter
                        .report_error("worker-pool", &format!("タスクエラー: {error}"))
                        .await;
                }
            }
        }

        // 実行中の処理を全て待ち切ってから終了する
        while let Some(joined) = in_flight.join_next().await {
            if let Err(error) = joined {
                reporter
                    .report_error("worker-pool", &format!("タスクエラー: {error}"))
                    .await;
            }
        }

        Ok(())
    })
}

/// 1アイテムの処理タスク
///
/// パーミットは所有権ごと持ち込み、成功・失敗・キャンセル・パニックの
/// いずれでもドロップで必ず解放される。完了通知は処理が完遂した
/// (成功または失敗した)場合のみ1件送信し、キャンセルで中断された
/// アイテムには送らない。
async fn process_item<P, R>(
    item: String,
    permit: OwnedSemaphorePermit,
    processor: Arc<P>,
    completion_tx: mpsc::UnboundedSender<CompletionSignal>,
    processed_count: Arc<AtomicUsize>,
    failed_count: Arc<AtomicUsize>,
    reporter: Arc<R>,
    cancel: CancellationToken,
) where
    P: ItemProcessor + 'static,
    R: EventReporter + 'static,
{
    reporter.report_processing_started(&item).await;

    let result = tokio::select! {
        _ = cancel.cancelled() => {
            reporter.report_cancelled("worker").await;
            return; // パーミットはドロップで解放される
        }
        result = processor.process(&item) => result,
    };

    match result {
        Ok(()) => {
            processed_count.fetch_add(1, Ordering::Relaxed);
            reporter.report_processing_finished(&item).await;
        }
        Err(error) => {
            // 失敗はこのアイテムに限定される
            failed_count.fetch_add(1, Ordering::Relaxed);
            reporter
                .report_error("worker", &format!("処理エラー: {item} - {error}"))
                .await;
        }
    }

    // 成否に関わらず完了通知を1件送信。クローズ済みなら黙って捨てる
    let _ = completion_tx.send(CompletionSignal);
    drop(permit);
}

/// 逐次ワーカー: 並列上限が不要な場合の縮退形
///
/// デキュー → 処理 → 完了通知を1アイテムずつ繰り返す。
/// パーミットプールを持たないN=1相当の契約で、処理の重なりは発生しない。
pub fn spawn_sequential_worker<P, R>(
    processor: Arc<P>,
    mut work_rx: mpsc::UnboundedReceiver<String>,
    completion_tx: mpsc::UnboundedSender<CompletionSignal>,
    processed_count: Arc<AtomicUsize>,
    failed_count: Arc<AtomicUsize>,
    reporter: Arc<R>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>>
where
    P: ItemProcessor + 'static,
    R: EventReporter + 'static,
{
    tokio::spawn(async move {
        loop {
            let item = tokio::select! {
                _ = cancel.cancelled() => {
                    reporter.report_cancelled("worker").await;
                    break;
                }
                received = work_rx.recv() => match received {
                    Some(item) => item,
                    None => break,
                }
            };

            reporter.report_processing_started(&item).await;

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    reporter.report_cancelled("worker").await;
                    break;
                }
                result = processor.process(&item) => result,
            };

            match result {
                Ok(()) => {
                    processed_count.fetch_add(1, Ordering::Relaxed);
                    reporter.report_processing_finished(&item).await;
                }
                Err(error) => {
                    failed_count.fetch_add(1, Ordering::Relaxed);
                    reporter
                        .report_error("worker", &format!("処理エラー: {item} - {error}"))
                        .await;
                }
            }

            let _ = completion_tx.send(CompletionSignal);
        }
        Ok(())
    })
}
