// 設定管理の具象実装

use crate::core::{PipelineConfig, PipelineError, PipelineResult};
use std::time::Duration;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultPipelineConfig {
    permit_count: usize,
    poll_interval: Duration,
    processing_latency: Duration,
}

impl DefaultPipelineConfig {
    pub fn new(permit_count: usize, poll_interval: Duration, processing_latency: Duration) -> Self {
        Self {
            permit_count,
            poll_interval,
            processing_latency,
        }
    }

    pub fn with_permit_count(mut self, permit_count: usize) -> Self {
        self.permit_count = permit_count;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_processing_latency(mut self, processing_latency: Duration) -> Self {
        self.processing_latency = processing_latency;
        self
    }

    /// 設定値の検証
    pub fn validate(&self) -> PipelineResult<()> {
        if self.permit_count == 0 {
            return Err(PipelineError::configuration(
                "パーミット数は1以上である必要があります",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(PipelineError::configuration(
                "ポーリング間隔は0より大きい必要があります",
            ));
        }
        Ok(())
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self {
            permit_count: 5,
            poll_interval: Duration::from_millis(1000),
            processing_latency: Duration::from_millis(500),
        }
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn permit_count(&self) -> usize {
        self.permit_count
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn processing_latency(&self) -> Duration {
        self.processing_latency
    }
}
