// ドメイン処理サービス

pub mod implementations;

pub use implementations::FixedLatencyProcessor;
