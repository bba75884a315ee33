//! 日志推送通道集成测试
//!
//! 桩后端在 /ws/logs 上接受 WebSocket 连接，回放历史日志后推送增量，
//! 验证 join_logs 握手、缓冲区替换与追加语义

use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use netflix_console::config::EnvConfig;
use netflix_console::services::log_stream;
use netflix_console::state::AppState;

#[derive(Clone, Default)]
struct WsStub {
    /// 客户端发来的第一条消息（应为 join_logs）
    first_message: Arc<Mutex<Option<String>>>,
}

async fn ws_handler(State(stub): State<WsStub>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve_logs(stub, socket))
}

async fn serve_logs(stub: WsStub, mut socket: WebSocket) {
    // 等待客户端加入日志组
    if let Some(Ok(Message::Text(text))) = socket.recv().await {
        *stub.first_message.lock().unwrap() = Some(text);
    }

    let history = json!({
        "event": "logs_history",
        "data": {"logs": [
            {"timestamp": "2024-03-01T08:00:00", "level": "INFO", "message": "history-1"},
            {"timestamp": "2024-03-01T08:00:01", "level": "INFO", "message": "history-2"},
        ]}
    });
    let increment = json!({
        "event": "new_logs",
        "data": {"logs": [
            {"timestamp": "2024-03-01T08:00:02", "level": "WARNING", "message": "push-1"},
        ]}
    });

    let _ = socket.send(Message::Text(history.to_string())).await;
    let _ = socket.send(Message::Text(increment.to_string())).await;

    // 保持连接直到客户端关闭
    while socket.recv().await.is_some() {}
}

#[tokio::test]
async fn log_stream_replays_history_then_appends() {
    let stub = WsStub::default();
    let router = Router::new()
        .route("/ws/logs", get(ws_handler))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ws stub");
    let addr = listener.local_addr().expect("ws stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("ws stub");
    });

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "test-token").unwrap();

    let state = Arc::new(AppState::new(EnvConfig {
        backend_url: format!("http://{}", addr),
        port: 0,
        token_path,
    }));

    tokio::spawn(log_stream::start(state.clone()));

    // 等待连接建立与两批消息送达
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    let first = stub.first_message.lock().unwrap().clone();
    assert_eq!(first.as_deref(), Some(r#"{"event":"join_logs"}"#));

    let buffer = state.log_buffer.read().await;
    let messages: Vec<String> = buffer.iter().map(|e| e.message.clone()).collect();
    assert_eq!(messages, vec!["history-1", "history-2", "push-1"]);

    drop(buffer);
    state.stop();
}
