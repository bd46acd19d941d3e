// チャンネルレイヤー - チャンネル生成とライフサイクル管理

pub mod manager;

pub use manager::ChannelManager;
