//! Netflix Checker 管理控制台
//!
//! 面向 Netflix 代理检测后端的本地管理面板：读取单文件 token 作为
//! 会话凭证，经 HTTP/WebSocket 与后端交互，页面在本地渲染后通过
//! 浏览器访问

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod view;
pub mod web;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::EnvConfig;
use crate::state::AppState;

/// 命令行覆盖项
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    /// 覆盖本地监听端口
    pub port_override: Option<u16>,
    /// 覆盖后端地址
    pub backend_override: Option<String>,
    /// 覆盖 token 文件路径
    pub token_file_override: Option<PathBuf>,
}

/// 初始化并运行控制台，直到收到退出信号
pub async fn init_and_run(runtime: RuntimeConfig) {
    let mut env_config = EnvConfig::from_env();
    if let Some(port) = runtime.port_override {
        env_config.port = port;
    }
    if let Some(backend) = runtime.backend_override {
        env_config.backend_url = backend.trim_end_matches('/').to_string();
    }
    if let Some(token_file) = runtime.token_file_override {
        env_config.token_path = token_file;
    }

    let port = env_config.port;
    let state = Arc::new(AppState::new(env_config));

    // 无 token 时不建立会话，页面停留在登录引导
    if state.authenticated() {
        state.start();
    } else {
        tracing::warn!(
            token_path = %state.config.token_path.display(),
            "No auth token, console starts unauthenticated"
        );
    }

    let app = web::router(state.clone());
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind console port");
            return;
        }
    };

    tracing::info!(addr = %addr, "Console listening");

    let shutdown_state = state.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
        shutdown_state.stop();
    });

    if let Err(e) = server.await {
        tracing::error!(error = %e, "Console server error");
    }
}
