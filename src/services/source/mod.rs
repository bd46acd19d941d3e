// データソースサービス

pub mod implementations;

pub use implementations::{ClockDataSource, QueueDataSource};
