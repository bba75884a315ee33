//! 本地控制台路由
//!
//! 页面渲染与动作转发。所有处理器都先检查会话 token，
//! 缺失或后端返回 401 时统一重定向到落地页 `/`

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::backend::models::document_to_yaml;
use crate::error::ConsoleError;
use crate::state::{AppState, ConfigSaveOutcome, RunNowOutcome};
use crate::view;

/// 构建控制台路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/console", get(console_page))
        .route("/console/config", post(save_config))
        .route("/console/scheduler/start", post(start_scheduler))
        .route("/console/scheduler/stop", post(stop_scheduler))
        .route("/console/scheduler/run-now", post(run_now))
        .route("/console/logs/clear", post(clear_logs))
        .route("/console/results/download", get(download_results))
        .route("/logout", post(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 控制台页面查询参数
#[derive(Debug, Deserialize)]
struct ConsoleQuery {
    tab: Option<String>,
    /// 重定向带回的瞬时提示
    notice: Option<String>,
    kind: Option<String>,
}

/// 配置保存表单
#[derive(Debug, Deserialize)]
struct SaveConfigForm {
    config: String,
}

/// 需要交互确认的动作表单
#[derive(Debug, Default, Deserialize)]
struct ConfirmForm {
    #[serde(default)]
    confirm: Option<String>,
}

impl ConfirmForm {
    fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

/// 拼接控制台页面地址，提示消息经过 URL 编码
pub fn console_url(tab: &str, notice: Option<(&str, &str)>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("tab", tab);
    if let Some((message, kind)) = notice {
        query.append_pair("notice", message);
        query.append_pair("kind", kind);
    }
    format!("/console?{}", query.finish())
}

/// run-now 结果到重定向目标的映射
///
/// 只有成功时才切换到日志面板
pub fn run_now_redirect_target(outcome: &RunNowOutcome) -> String {
    match outcome {
        RunNowOutcome::NotConfirmed => console_url("config", Some(("已取消执行", "info"))),
        RunNowOutcome::Started => console_url("logs", Some(("任务已开始执行，请查看日志", "info"))),
        RunNowOutcome::Unauthorized => "/".to_string(),
        RunNowOutcome::Failed(message) => console_url("config", Some((message, "danger"))),
    }
}

fn redirect_with_notice(tab: &str, notice: &str, kind: &str) -> Redirect {
    Redirect::to(&console_url(tab, Some((notice, kind))))
}

/// 落地页：已认证直接进入控制台，否则展示登录引导
async fn landing(State(state): State<Arc<AppState>>) -> Response {
    if state.authenticated() {
        Redirect::to("/console").into_response()
    } else {
        Html(view::render_landing(
            &state.config.token_path.display().to_string(),
        ))
        .into_response()
    }
}

/// 控制台主页面，按标签懒加载面板内容
async fn console_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConsoleQuery>,
) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    let tab = query.tab.as_deref().unwrap_or("config");

    let content = match tab {
        "logs" => {
            let buffer = state.log_buffer.read().await;
            view::logs::render_logs_panel(buffer.iter())
        }
        "results" => match state.backend.fetch_results().await {
            Ok(results) => view::results::render_results_panel(results.as_ref()),
            Err(ConsoleError::Unauthorized) => return Redirect::to("/").into_response(),
            Err(e) => view::render_panel_error(&e.notice("加载结果失败")),
        },
        "about" => match state.backend.fetch_version().await {
            Ok(version) => view::render_about_panel(&version),
            Err(ConsoleError::Unauthorized) => return Redirect::to("/").into_response(),
            Err(e) => view::render_panel_error(&e.notice("获取版本信息失败")),
        },
        _ => match state.backend.fetch_config().await {
            Ok(document) => view::render_config_panel(&document_to_yaml(&document)),
            Err(ConsoleError::Unauthorized) => return Redirect::to("/").into_response(),
            Err(e) => view::render_panel_error(&e.notice("加载配置失败")),
        },
    };

    let status = state.status_snapshot().await;
    let notice = query
        .notice
        .as_deref()
        .map(|message| (message, query.kind.as_deref().unwrap_or("info")));

    Html(view::render_console(tab, status, notice, &content)).into_response()
}

/// 保存配置：本地 YAML 校验失败时不访问后端
async fn save_config(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SaveConfigForm>,
) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    match state.save_config_text(&form.config).await {
        ConfigSaveOutcome::Saved => {
            redirect_with_notice("config", "配置已保存", "success").into_response()
        }
        ConfigSaveOutcome::InvalidYaml(message) => redirect_with_notice(
            "config",
            &format!("配置格式错误: {}", message),
            "danger",
        )
        .into_response(),
        ConfigSaveOutcome::Unauthorized => Redirect::to("/").into_response(),
        ConfigSaveOutcome::Failed(message) => {
            redirect_with_notice("config", &message, "danger").into_response()
        }
    }
}

/// 启动调度器，成功后刷新状态快照
async fn start_scheduler(State(state): State<Arc<AppState>>) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    match state.backend.start_scheduler().await {
        Ok(()) => {
            state.refresh_status().await;
            redirect_with_notice("config", "调度器已启动", "success").into_response()
        }
        Err(ConsoleError::Unauthorized) => Redirect::to("/").into_response(),
        Err(e) => redirect_with_notice("config", &e.notice("启动失败"), "danger").into_response(),
    }
}

/// 停止调度器
async fn stop_scheduler(State(state): State<Arc<AppState>>) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    match state.backend.stop_scheduler().await {
        Ok(()) => {
            state.refresh_status().await;
            redirect_with_notice("config", "调度器已停止", "success").into_response()
        }
        Err(ConsoleError::Unauthorized) => Redirect::to("/").into_response(),
        Err(e) => redirect_with_notice("config", &e.notice("停止失败"), "danger").into_response(),
    }
}

/// 立即执行检测任务，需交互确认；成功后切换到日志面板
async fn run_now(State(state): State<Arc<AppState>>, Form(form): Form<ConfirmForm>) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    let outcome = state.run_now(form.confirmed()).await;
    Redirect::to(&run_now_redirect_target(&outcome)).into_response()
}

/// 清空本地日志视图，需交互确认
async fn clear_logs(State(state): State<Arc<AppState>>, Form(form): Form<ConfirmForm>) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    if !form.confirmed() {
        return Redirect::to(&console_url("logs", None)).into_response();
    }

    state.clear_logs().await;
    redirect_with_notice("logs", "日志已清空", "success").into_response()
}

/// 下载原始结果文件并以附件形式转发给浏览器
async fn download_results(State(state): State<Arc<AppState>>) -> Response {
    if !state.authenticated() {
        return Redirect::to("/").into_response();
    }

    match state.backend.download_results().await {
        Ok(download) => (
            [
                (header::CONTENT_TYPE, download.content_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.filename),
                ),
            ],
            download.bytes,
        )
            .into_response(),
        Err(ConsoleError::Unauthorized) => Redirect::to("/").into_response(),
        Err(e) => {
            redirect_with_notice("results", &e.notice("下载失败"), "danger").into_response()
        }
    }
}

/// 登出：清除 token、终止会话、回到落地页
async fn logout(State(state): State<Arc<AppState>>) -> Response {
    state.logout();
    Redirect::to("/").into_response()
}
