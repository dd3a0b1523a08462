//! 支付错误分类服务
//!
//! 启动时加载规则表，对外提供 /classify REST API。

use std::{sync::Arc, time::Duration};

use resolution_service::{AppState, SERVICE_NAME, build_router};
use resolution_shared::{
    config::AppConfig,
    error::ResolutionError,
    observability::{self, metrics as obs_metrics},
};
use rule_engine::ClassificationEngine;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 配置文件均为可选，只有内容格式错误时才会失败
    let config = AppConfig::load(SERVICE_NAME).map_err(ResolutionError::from)?;

    let _guard = observability::init(&config.observability, &config.service_name).await?;

    info!(
        environment = %config.environment,
        rules_path = %config.rules.path.display(),
        "Starting {} on {}",
        config.service_name,
        config.server_addr()
    );

    // 规则表不可用时拒绝启动
    let engine = ClassificationEngine::from_path(&config.rules.path).map_err(|e| {
        ResolutionError::RuleSource(format!("{}: {}", config.rules.path.display(), e))
    })?;

    let stats = engine.store().stats();
    if stats.rules_count == 0 {
        warn!("规则表为空，所有请求都将返回 UNKNOWN");
    }
    info!(
        rules = stats.rules_count,
        indexed_codes = stats.indexed_codes,
        pattern_rules = stats.pattern_rules,
        substring_rules = stats.substring_rules,
        skipped = engine.store().skipped(),
        "Rule table loaded"
    );
    obs_metrics::set_rules_loaded(stats.rules_count);

    let state = AppState::new(Arc::new(engine));
    let app = build_router(
        state,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("注册 Ctrl+C 处理器失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("注册 SIGTERM 处理器失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
