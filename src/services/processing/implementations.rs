// ドメイン処理の具象実装

use crate::core::ItemProcessor;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 固定時間スリープするシミュレーション用プロセッサー
#[derive(Debug, Clone)]
pub struct FixedLatencyProcessor {
    latency: Duration,
}

impl FixedLatencyProcessor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for FixedLatencyProcessor {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
        }
    }
}

#[async_trait]
impl ItemProcessor for FixedLatencyProcessor {
    async fn process(&self, _item: &str) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_fixed_latency_processor_sleeps() {
        let processor = FixedLatencyProcessor::new(Duration::from_millis(30));

        let start = Instant::now();
        processor.process("アイテム").await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_default_latency_is_500ms() {
        let processor = FixedLatencyProcessor::default();
        assert_eq!(processor.latency, Duration::from_millis(500));
    }
}
