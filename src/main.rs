use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use data_pipeline::{
    ClockDataSource, ConsoleEventReporter, DefaultPipelineConfig, FixedLatencyProcessor, Pipeline,
    PipelineConfig,
};

/// チャンネルパイプラインのデモ
#[derive(Parser, Debug)]
#[command(version, about = "インプロセス・データパイプライン デモ")]
struct Args {
    /// 同時処理数の上限(パーミット数)
    #[arg(long, default_value_t = 5)]
    permits: usize,

    /// データ取得間隔(ミリ秒)
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,

    /// 1アイテムあたりのシミュレート処理時間(ミリ秒)
    #[arg(long, default_value_t = 500)]
    latency_ms: u64,

    /// 実行時間(秒)。省略時はCtrl-Cまで実行
    #[arg(long)]
    run_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!("🚀 データパイプライン - デモ");

    let config = DefaultPipelineConfig::default()
        .with_permit_count(args.permits)
        .with_poll_interval(Duration::from_millis(args.poll_interval_ms))
        .with_processing_latency(Duration::from_millis(args.latency_ms));
    config.validate()?;

    println!("⚙️  設定:");
    println!("   - パーミット数: {}", config.permit_count());
    println!("   - 取得間隔: {:?}", config.poll_interval());
    println!("   - 処理時間: {:?}", config.processing_latency());

    let mut pipeline = Pipeline::new(
        ClockDataSource::new(),
        FixedLatencyProcessor::new(config.processing_latency()),
        config,
        ConsoleEventReporter::new(),
    );

    pipeline.start()?;

    match args.run_secs {
        Some(secs) => {
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        None => {
            // Ctrl-Cでシャットダウン
            tokio::signal::ctrl_c().await?;
            println!("\n🛑 シャットダウン要求を受信しました");
        }
    }

    let summary = pipeline.stop().await?;

    println!("\n✅ 停止完了");
    println!("📊 実行サマリー:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
