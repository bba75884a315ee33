//! 日志推送通道
//!
//! 每个会话建立一条 WebSocket 连接，认证凭证随升级请求头携带。
//! 连接成功后发送 `join_logs`，之后处理两类入站事件：
//! `logs_history`（整体回放，替换本地缓冲）与 `new_logs`（增量追加）。
//! 断开与连接错误只记录日志，不做自动重连

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::backend::models::LogStreamMessage;
use crate::state::AppState;

/// 启动日志推送通道任务
pub async fn start(state: Arc<AppState>) {
    let Some(token) = state.token_store.current() else {
        warn!("Log stream not started: no auth token");
        return;
    };

    let ws_url = state.config.ws_logs_url();
    if let Err(e) = run_channel(&state, &ws_url, &token).await {
        error!(url = %ws_url, error = %e, "Log stream error");
    }
}

/// 建立连接并处理入站事件，直到断开或会话取消
async fn run_channel(state: &Arc<AppState>, ws_url: &str, token: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(ws_url)?;

    // 手工构建升级请求，认证 token 随 Authorization 头携带
    let request = tokio_tungstenite::tungstenite::http::Request::builder()
        .uri(ws_url)
        .header("Authorization", format!("Bearer {}", token))
        .header("Host", url.host_str().unwrap_or("localhost"))
        .header("Connection", "Upgrade")
        .header("Upgrade", "websocket")
        .header("Sec-WebSocket-Version", "13")
        .header(
            "Sec-WebSocket-Key",
            tokio_tungstenite::tungstenite::handshake::client::generate_key(),
        )
        .body(())?;

    info!(url = %ws_url, "Connecting to log stream");

    let (ws_stream, _) = connect_async(request).await?;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    info!("Log stream connected");

    // 加入日志广播组，服务端随后回放一次历史日志
    let join = serde_json::to_string(&LogStreamMessage::JoinLogs)?;
    ws_tx.send(Message::Text(join)).await?;

    let shutdown = state.shutdown_token();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                info!("Log stream closed by session shutdown");
                break;
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_event(state, &text).await;
                    }
                    Some(Ok(Message::Binary(data))) => {
                        if let Ok(text) = String::from_utf8(data) {
                            handle_event(state, &text).await;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_tx.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Log stream closed by server");
                        break;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Log stream WebSocket error");
                        break;
                    }
                    None => {
                        info!("Log stream ended");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// 处理一条入站事件
async fn handle_event(state: &Arc<AppState>, text: &str) {
    match serde_json::from_str::<LogStreamMessage>(text) {
        Ok(LogStreamMessage::LogsHistory { logs }) => {
            debug!(count = logs.len(), "Received log history");
            state.log_buffer.write().await.replace(logs);
        }
        Ok(LogStreamMessage::NewLogs { logs }) => {
            state.log_buffer.write().await.append(logs);
        }
        Ok(other) => {
            debug!(?other, "Ignoring log stream message");
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse log stream message");
        }
    }
}
