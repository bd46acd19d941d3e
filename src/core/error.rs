// パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("チャンネルクローズ: {component} - 書き込み先は既に閉じられています")]
    ChannelClosed { component: String },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("データ取得エラー: {source}")]
    DataSource {
        #[source]
        source: anyhow::Error,
    },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("内部エラー: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// チャンネルクローズエラーの作成
    pub fn channel_closed(component: impl Into<String>) -> Self {
        Self::ChannelClosed {
            component: component.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// データ取得エラーの作成
    pub fn data_source(source: anyhow::Error) -> Self {
        Self::DataSource { source }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::Internal { source }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// チャンネルクローズはシャットダウン時の正常な帰結として扱い、
    /// ループの終了のみを意味する。設定エラーは起動前の不備であり回復不能。
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ChannelClosed { .. } => true,
            Self::Configuration { .. } => false,
            Self::DataSource { .. } => true,
            Self::Task { .. } => true,
            Self::Internal { .. } => false,
        }
    }
}

// From実装を個別に追加
impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        PipelineError::Internal { source: error }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(error: tokio::task::JoinError) -> Self {
        PipelineError::Task { source: error }
    }
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_pipeline_error_creation() {
        let closed_error = PipelineError::channel_closed("poller");
        assert!(closed_error.to_string().contains("poller"));
        assert!(closed_error.to_string().contains("チャンネルクローズ"));

        let config_error = PipelineError::configuration("パーミット数は1以上である必要があります");
        assert!(config_error.to_string().contains("設定エラー"));

        let source_error = PipelineError::data_source(anyhow::anyhow!("接続失敗"));
        assert!(source_error.to_string().contains("データ取得エラー"));
    }

    #[test]
    fn test_error_source_chain() {
        let root = anyhow::anyhow!("ルートエラー");
        let pipeline_error = PipelineError::internal(root);

        // エラーチェーンが正しく設定されていることを確認
        assert!(pipeline_error.source().is_some());
    }

    #[test]
    fn test_error_recoverability() {
        assert!(PipelineError::channel_closed("worker").is_recoverable());
        assert!(PipelineError::data_source(anyhow::anyhow!("一時エラー")).is_recoverable());
        assert!(!PipelineError::configuration("不正な設定").is_recoverable());
        assert!(!PipelineError::internal(anyhow::anyhow!("予期しないエラー")).is_recoverable());
    }

    #[tokio::test]
    async fn test_task_error_from_join_error() {
        let task = tokio::spawn(async {
            tokio::task::yield_now().await;
            std::future::pending::<()>().await;
        });
        task.abort();

        let join_error = task.await.expect_err("タスクエラーが期待されます");
        let pipeline_error = PipelineError::from(join_error);

        assert!(pipeline_error.to_string().contains("タスクエラー"));
        assert!(pipeline_error.is_recoverable());
    }
}
