use anyhow::{anyhow, Context, Result};
use pman_server::api::{AppState, RestApi};
use pman_server::config::{self, LogConfig};
use pman_server::storage::{run_migrations, Database};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化配置
    let app_config = config::init_config().context("無法加載應用程序配置")?;

    // 初始化日誌系統
    init_logging(&app_config.log)?;

    // 建立資料庫句柄並初始化資料表
    let db = Database::connect(&app_config.database)
        .await
        .context("無法初始化資料庫連接池")?;
    run_migrations(db.pool())
        .await
        .context("資料庫遷移執行失敗")?;

    // 初始化REST API
    let rest_api = RestApi::new(app_config.server.clone(), AppState::from_database(&db));
    info!("監聽端口: {}", app_config.server.port);
    let served = rest_api.start(shutdown_signal()).await;

    // 無論服務是否正常結束都釋放連接池
    db.close().await;
    served
}

// 等待關閉信號
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("接收到關閉信號，正在退出..."),
        Err(err) => error!("無法監聽關閉信號: {}", err),
    }
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<()> {
    // RUST_LOG 優先，否則使用配置中的級別
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.level.to_lowercase()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if log_config.is_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
