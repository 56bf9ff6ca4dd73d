use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pman_server::config;
use pman_server::storage::{self, Database};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "migrate", about = "pman-server 數據庫遷移工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 運行所有未應用的遷移
    Run,

    /// 檢查遷移狀態
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌系統
    tracing_subscriber::fmt()
        .with_env_filter("pman_server=info,migrate=info")
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // 解析命令行參數
    let cli = Cli::parse();

    let app_config = config::init_config().context("無法加載應用程序配置")?;
    let db = Database::connect(&app_config.database)
        .await
        .context("無法初始化資料庫連接池")?;

    // 執行命令
    let outcome = match cli.command {
        Commands::Run => {
            info!("開始運行資料庫遷移: {}", app_config.database.url);
            storage::run_migrations(db.pool())
                .await
                .context("資料庫遷移執行失敗")
        }
        Commands::Status => storage::migration_status(db.pool())
            .await
            .context("無法讀取遷移狀態")
            .map(|statuses| {
                for status in statuses {
                    println!(
                        "{:>4}  {:<8}  {}",
                        status.version,
                        if status.applied { "applied" } else { "pending" },
                        status.description
                    );
                }
            }),
    };

    db.close().await;
    outcome
}
