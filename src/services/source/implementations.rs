// データ取得元の具象実装

use crate::core::DataSource;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// 現在時刻を埋め込んだアイテムを生成するデータソース
///
/// 外部DBの代役。呼び出すたびに必ず1件返す。
#[derive(Debug, Default, Clone)]
pub struct ClockDataSource;

impl ClockDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for ClockDataSource {
    async fn fetch(&self) -> Result<Option<String>> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        Ok(Some(format!("データ: {now}")))
    }
}

/// 事前に与えたアイテムを順に返すデータソース(テスト・デモ用)
///
/// 使い切った後は「データなし」を返し続ける。
#[derive(Debug)]
pub struct QueueDataSource {
    items: Mutex<VecDeque<String>>,
}

impl QueueDataSource {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items: Mutex::new(items.into()),
        }
    }

    /// 未配信のアイテム数を取得
    pub fn remaining(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl DataSource for QueueDataSource {
    async fn fetch(&self) -> Result<Option<String>> {
        let next = self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next)
    }
}
