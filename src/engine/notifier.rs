// Notifier - 完了通知の監視機能

use crate::core::types::CompletionSignal;
use crate::core::EventReporter;
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Notifier: 完了チャンネルを監視し、1シグナルにつき1回だけ反応する
///
/// ワーカープールとは完全に分離されており、チャンネル経由でのみ連携する。
/// 終端(クローズ後のドレイン完了)またはキャンセルで正常終了する。
pub fn spawn_completion_notifier<R>(
    mut completion_rx: mpsc::UnboundedReceiver<CompletionSignal>,
    completed_count: Arc<AtomicUsize>,
    reporter: Arc<R>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>>
where
    R: EventReporter + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    reporter.report_cancelled("notifier").await;
                    break;
                }
                received = completion_rx.recv() => match received {
                    Some(CompletionSignal) => {
                        let total = completed_count.fetch_add(1, Ordering::Relaxed) + 1;
                        reporter.report_completion(total).await;
                    }
                    None => break, // チャンネル終端
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockEventReporter;
    use tokio::time::{timeout, Duration};

    fn counting_reporter() -> Arc<MockEventReporter> {
        let mut reporter = MockEventReporter::new();
        reporter.expect_report_completion().returning(|_| ());
        reporter.expect_report_cancelled().returning(|_| ());
        Arc::new(reporter)
    }

    #[tokio::test]
    async fn test_notifier_counts_each_signal_once() {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let completed = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let handle = spawn_completion_notifier(
            completion_rx,
            Arc::clone(&completed),
            counting_reporter(),
            cancel,
        );

        for _ in 0..4 {
            completion_tx.send(CompletionSignal).unwrap();
        }
        drop(completion_tx); // チャンネル終端

        handle.await.unwrap().unwrap();
        assert_eq!(completed.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn test_notifier_drains_buffered_signals_before_end_of_stream() {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        // 先にバッファしてから閉じる
        completion_tx.send(CompletionSignal).unwrap();
        completion_tx.send(CompletionSignal).unwrap();
        drop(completion_tx);

        let completed = Arc::new(AtomicUsize::new(0));
        let handle = spawn_completion_notifier(
            completion_rx,
            Arc::clone(&completed),
            counting_reporter(),
            CancellationToken::new(),
        );

        handle.await.unwrap().unwrap();
        assert_eq!(completed.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_notifier_terminates_promptly_on_cancellation() {
        let (_completion_tx, completion_rx) = mpsc::unbounded_channel::<CompletionSignal>();
        let cancel = CancellationToken::new();

        let handle = spawn_completion_notifier(
            completion_rx,
            Arc::new(AtomicUsize::new(0)),
            counting_reporter(),
            cancel.clone(),
        );

        cancel.cancel();

        // 読み取り待ちはキャンセルで速やかに解放され、エラーにならない
        let result = timeout(Duration::from_secs(1), handle)
            .await
            .expect("キャンセル後に速やかに終了するべき")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_notifier_reports_running_total() {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let totals = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut reporter = MockEventReporter::new();
        let seen = Arc::clone(&totals);
        reporter
            .expect_report_completion()
            .returning(move |total| seen.lock().unwrap().push(total));

        let handle = spawn_completion_notifier(
            completion_rx,
            Arc::new(AtomicUsize::new(0)),
            Arc::new(reporter),
            CancellationToken::new(),
        );

        for _ in 0..3 {
            completion_tx.send(CompletionSignal).unwrap();
        }
        drop(completion_tx);
        handle.await.unwrap().unwrap();

        assert_eq!(*totals.lock().unwrap(), vec![1, 2, 3]);
    }
}
