//! 控制台与后端交互的集成测试
//!
//! 在 127.0.0.1 随机端口上起一个桩后端，验证请求包装、
//! 401 处理、配置保存与下载文件名解析的端到端行为

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use netflix_console::backend::models::document_to_yaml;
use netflix_console::config::EnvConfig;
use netflix_console::error::ConsoleError;
use netflix_console::state::{AppState, ConfigSaveOutcome, RunNowOutcome};
use netflix_console::web::run_now_redirect_target;

/// 启动桩后端，返回 base URL
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub backend");
    });
    format!("http://{}", addr)
}

/// 构建持有有效 token 的控制台状态
fn make_state(backend_url: &str, dir: &tempfile::TempDir) -> Arc<AppState> {
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "test-token").expect("write token");
    Arc::new(AppState::new(EnvConfig {
        backend_url: backend_url.to_string(),
        port: 0,
        token_path,
    }))
}

#[tokio::test]
async fn run_now_sends_nothing_without_confirmation() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handler = hits.clone();

    let router = Router::new()
        .route(
            "/api/scheduler/run-now",
            post(move || {
                let hits = hits_handler.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"success": true}))
                }
            }),
        )
        .route(
            "/api/scheduler/status",
            get(|| async { Json(json!({"status": {"running": true, "task_running": true}})) }),
        );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    // 未确认：不发出任何请求
    let outcome = state.run_now(false).await;
    assert_eq!(outcome, RunNowOutcome::NotConfirmed);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(!run_now_redirect_target(&outcome).contains("tab=logs"));

    // 确认：恰好一次 POST，且切换到日志面板
    let outcome = state.run_now(true).await;
    assert_eq!(outcome, RunNowOutcome::Started);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(run_now_redirect_target(&outcome).contains("tab=logs"));

    // 成功路径顺带刷新了状态快照
    let status = state.status_snapshot().await;
    assert!(status.running);
    assert!(status.task_running);
}

#[tokio::test]
async fn run_now_surfaces_backend_error_verbatim() {
    let router = Router::new().route(
        "/api/scheduler/run-now",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "任务正在执行中"})),
            )
        }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let outcome = state.run_now(true).await;
    assert_eq!(outcome, RunNowOutcome::Failed("任务正在执行中".to_string()));
    assert!(!run_now_redirect_target(&outcome).contains("tab=logs"));
}

#[tokio::test]
async fn unauthorized_response_clears_token() {
    let router = Router::new().route(
        "/api/scheduler/status",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);
    let token_path = dir.path().join("token");

    assert!(state.authenticated());
    let result = state.backend.scheduler_status().await;
    assert!(matches!(result, Err(ConsoleError::Unauthorized)));

    // token 文件与缓存都被清除，会话随之失效
    assert!(!token_path.exists());
    assert!(!state.authenticated());
}

#[tokio::test]
async fn unauthorized_status_poll_terminates_session() {
    let router = Router::new().route(
        "/api/scheduler/status",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);
    assert!(!state.shutdown_token().is_cancelled());

    // 轮询首个 tick 即触发，撞上 401 后应终止整个会话
    tokio::spawn(netflix_console::services::status_poller::start(
        state.clone(),
    ));
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    assert!(!state.authenticated());
    assert!(state.shutdown_token().is_cancelled());
}

#[tokio::test]
async fn unauthorized_run_now_terminates_session() {
    let router = Router::new().route(
        "/api/scheduler/run-now",
        post(|| async { StatusCode::UNAUTHORIZED }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let outcome = state.run_now(true).await;
    assert_eq!(outcome, RunNowOutcome::Unauthorized);
    assert!(state.shutdown_token().is_cancelled());
}

#[tokio::test]
async fn unauthorized_download_also_clears_token() {
    let router = Router::new().route(
        "/api/results/download",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let result = state.backend.download_results().await;
    assert!(matches!(result, Err(ConsoleError::Unauthorized)));
    assert!(!state.authenticated());
}

#[tokio::test]
async fn save_config_validates_yaml_before_sending() {
    let posted: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));
    let posted_handler = posted.clone();

    let router = Router::new().route(
        "/api/config",
        post(move |Json(body): Json<serde_json::Value>| {
            let posted = posted_handler.clone();
            async move {
                posted.lock().unwrap().push(body);
                Json(json!({"success": true}))
            }
        }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    // 非法 YAML：不发出网络请求
    let outcome = state.save_config_text("proxy: [unclosed").await;
    assert!(matches!(outcome, ConfigSaveOutcome::InvalidYaml(_)));
    assert!(posted.lock().unwrap().is_empty());

    // 合法 YAML：文档以 JSON 形式送达后端
    let outcome = state
        .save_config_text("proxy:\n  port: 7890\ncheck_urls:\n  - https://example.com\n")
        .await;
    assert_eq!(outcome, ConfigSaveOutcome::Saved);

    let bodies = posted.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["proxy"]["port"], 7890);
    assert_eq!(bodies[0]["check_urls"][0], "https://example.com");
}

#[tokio::test]
async fn fetch_config_renders_as_yaml_text() {
    let router = Router::new().route(
        "/api/config",
        get(|| async { Json(json!({"config": {"check_interval": 30, "proxy": {"port": 7890}}})) }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let document = state.backend.fetch_config().await.unwrap();
    let yaml = document_to_yaml(&document);
    assert!(yaml.contains("check_interval: 30"));
    assert!(yaml.contains("port: 7890"));
}

#[tokio::test]
async fn download_uses_content_disposition_filename() {
    let router = Router::new().route(
        "/api/results/download",
        get(|| async {
            (
                [(
                    header::CONTENT_DISPOSITION,
                    r#"attachment; filename="r.json""#,
                )],
                r#"{"summary": {}}"#,
            )
        }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let download = state.backend.download_results().await.unwrap();
    assert_eq!(download.filename, "r.json");
    assert_eq!(download.bytes, br#"{"summary": {}}"#);
}

#[tokio::test]
async fn download_falls_back_to_default_filename() {
    let router = Router::new().route("/api/results/download", get(|| async { "{}" }));

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let download = state.backend.download_results().await.unwrap();
    assert_eq!(download.filename, "netflix_check_results.json");
}

#[tokio::test]
async fn null_results_map_to_empty_state() {
    let router = Router::new().route(
        "/api/results",
        get(|| async { Json(json!({"success": true, "results": null, "message": "暂无检测结果"})) }),
    );

    let backend_url = spawn_backend(router).await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&backend_url, &dir);

    let results = state.backend.fetch_results().await.unwrap();
    assert!(results.is_none());
}

#[tokio::test]
async fn missing_token_short_circuits_requests() {
    // 桩后端不注册任何路由：有请求发出就会失败而非 Unauthorized
    let backend_url = spawn_backend(Router::new()).await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("missing-token");
    let state = Arc::new(AppState::new(EnvConfig {
        backend_url,
        port: 0,
        token_path,
    }));

    assert!(!state.authenticated());
    let result = state.backend.scheduler_status().await;
    assert!(matches!(result, Err(ConsoleError::Unauthorized)));
}
