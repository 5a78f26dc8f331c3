use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucket_gateway::config;
use bucket_gateway::state::AppState;
use bucket_gateway::storage::{BucketTable, StoreManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bucket_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("bucket-gateway {} (built {})", env!("CARGO_PKG_VERSION"), env!("BUILD_TIME"));

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;

    // Register all store driver factories / 注册所有存储驱动工厂
    let mut store_manager = StoreManager::new();
    bucket_gateway::register_store_drivers(&mut store_manager);

    // Build bucket table once; unconfigured buckets answer 404 / 构建存储桶路由表
    let buckets = BucketTable::build(&app_config.buckets, &store_manager)?;
    if buckets.mounts().is_empty() {
        tracing::warn!("No buckets configured, every request will be answered with 404");
    }

    let state = Arc::new(AppState::new(buckets));
    let app = bucket_gateway::api::build_router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
