//! 页面渲染
//!
//! 纯函数：视图模型 -> HTML 字符串，不依赖任何运行时状态，
//! 便于脱离服务进程单测。模板使用内嵌字符串插值，不引入模板引擎

pub mod logs;
pub mod results;

use crate::backend::models::{SchedulerStatus, VersionInfo};
use crate::config::constants::VERSION;

/// HTML 转义，防止自由文本字段注入标记
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 调度器运行状态徽章：固定的 文案+样式 组合
pub fn scheduler_badge(running: bool) -> (&'static str, &'static str) {
    if running {
        ("运行中", "badge badge-success")
    } else {
        ("已停止", "badge badge-secondary")
    }
}

/// 检测任务状态徽章
pub fn task_badge(task_running: bool) -> (&'static str, &'static str) {
    if task_running {
        ("执行中", "badge badge-warning")
    } else {
        ("空闲", "badge badge-info")
    }
}

/// 瞬时提示条
pub fn alert_html(message: &str, kind: &str) -> String {
    let class = match kind {
        "success" | "danger" | "info" => kind,
        _ => "info",
    };
    format!(
        r#"<div class="alert alert-{class}">{message}</div>"#,
        class = class,
        message = escape_html(message),
    )
}

/// 配置面板：可编辑的 YAML 文本域
pub fn render_config_panel(yaml_text: &str) -> String {
    format!(
        r#"<form method="post" action="/console/config">
<textarea name="config" class="config-editor" rows="24" spellcheck="false">{yaml}</textarea>
<div class="panel-actions">
  <button type="submit" class="btn btn-primary">保存配置</button>
  <a class="btn" href="/console?tab=config">重新加载</a>
</div>
</form>"#,
        yaml = escape_html(yaml_text),
    )
}

/// 关于面板：应用版本与 mihomo 信息
pub fn render_about_panel(version: &VersionInfo) -> String {
    let mut html = format!(
        "<p><strong>应用版本:</strong> {}</p>\n<p><strong>控制台版本:</strong> {}</p>",
        escape_html(&version.app_version),
        VERSION,
    );
    if let Some(info) = &version.mihomo_info {
        html.push_str(&format!(
            "\n<p><strong>Mihomo信息:</strong></p>\n<pre class=\"version-info\">{}</pre>",
            escape_html(info),
        ));
    }
    html
}

/// 加载失败的面板占位
pub fn render_panel_error(message: &str) -> String {
    format!(
        r#"<div class="panel-error">{}</div>"#,
        escape_html(message)
    )
}

/// 登录引导页（无 token 时的落地页）
pub fn render_landing(token_path: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>Netflix Checker 控制台</title>
<style>{css}</style>
</head>
<body>
<div class="landing">
  <h1>Netflix Checker 控制台</h1>
  <p>未找到会话 token。请先通过登录流程获取 token 并写入：</p>
  <pre>{path}</pre>
  <p>写入后重启控制台即可进入管理面板。</p>
</div>
</body>
</html>"#,
        css = BASE_CSS,
        path = escape_html(token_path),
    )
}

/// 完整控制台页面
///
/// `notice` 为重定向带回的瞬时提示，`content` 为当前标签页面板
pub fn render_console(
    active_tab: &str,
    status: SchedulerStatus,
    notice: Option<(&str, &str)>,
    content: &str,
) -> String {
    let (sched_label, sched_class) = scheduler_badge(status.running);
    let (task_label, task_class) = task_badge(status.task_running);

    let alert = notice
        .map(|(message, kind)| alert_html(message, kind))
        .unwrap_or_default();

    let tabs: String = [
        ("config", "配置"),
        ("logs", "日志"),
        ("results", "结果"),
        ("about", "关于"),
    ]
    .iter()
    .map(|(tab, label)| {
        let class = if *tab == active_tab { "tab active" } else { "tab" };
        format!(
            r#"<a class="{class}" href="/console?tab={tab}">{label}</a>"#,
            class = class,
            tab = tab,
            label = label,
        )
    })
    .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>Netflix Checker 控制台</title>
<style>{css}</style>
</head>
<body>
<header class="topbar">
  <h1>Netflix Checker 控制台</h1>
  <div class="status">
    调度器 <span class="{sched_class}">{sched_label}</span>
    任务 <span class="{task_class}">{task_label}</span>
  </div>
  <div class="controls">
    <form method="post" action="/console/scheduler/start"><button class="btn">启动调度器</button></form>
    <form method="post" action="/console/scheduler/stop"><button class="btn">停止调度器</button></form>
    <form method="post" action="/console/scheduler/run-now" onsubmit="return confirm('确定要立即执行检测任务吗？')">
      <input type="hidden" name="confirm" value="yes">
      <button class="btn btn-primary">立即执行</button>
    </form>
    <a class="btn" href="/console/results/download">下载结果</a>
    <form method="post" action="/logout"><button class="btn btn-muted">退出登录</button></form>
  </div>
</header>
{alert}
<nav class="tabs">{tabs}</nav>
<main class="panel">
{content}
</main>
</body>
</html>"#,
        css = BASE_CSS,
        sched_class = sched_class,
        sched_label = sched_label,
        task_class = task_class,
        task_label = task_label,
        alert = alert,
        tabs = tabs,
        content = content,
    )
}

/// 基础样式
const BASE_CSS: &str = r#"
body { font-family: -apple-system, "PingFang SC", "Microsoft YaHei", sans-serif; margin: 0; background: #f5f6f8; color: #222; }
.topbar { display: flex; align-items: center; gap: 16px; padding: 12px 20px; background: #fff; border-bottom: 1px solid #e0e0e0; flex-wrap: wrap; }
.topbar h1 { font-size: 18px; margin: 0; }
.controls { display: flex; gap: 8px; margin-left: auto; flex-wrap: wrap; }
.controls form { margin: 0; }
.btn { padding: 6px 12px; border: 1px solid #ccc; border-radius: 4px; background: #fff; cursor: pointer; text-decoration: none; color: #222; font-size: 13px; }
.btn-primary { background: #0d6efd; border-color: #0d6efd; color: #fff; }
.btn-muted { color: #888; }
.badge { padding: 2px 8px; border-radius: 10px; font-size: 12px; color: #fff; }
.badge-success { background: #198754; }
.badge-secondary { background: #6c757d; }
.badge-warning { background: #ffc107; color: #222; }
.badge-info { background: #0dcaf0; color: #222; }
.tabs { display: flex; gap: 4px; padding: 10px 20px 0; }
.tab { padding: 8px 16px; border-radius: 4px 4px 0 0; background: #e9ecef; text-decoration: none; color: #444; }
.tab.active { background: #fff; font-weight: bold; }
.panel { margin: 0 20px 20px; background: #fff; padding: 16px; border-radius: 0 4px 4px 4px; }
.alert { margin: 10px 20px 0; padding: 10px 14px; border-radius: 4px; }
.alert-success { background: #d1e7dd; color: #0f5132; }
.alert-danger { background: #f8d7da; color: #842029; }
.alert-info { background: #cff4fc; color: #055160; }
.config-editor { width: 100%; font-family: monospace; font-size: 13px; box-sizing: border-box; }
.panel-actions { margin-top: 10px; display: flex; gap: 8px; }
.log-view { font-family: monospace; font-size: 12px; max-height: 560px; overflow-y: auto; background: #111; color: #ddd; padding: 10px; border-radius: 4px; }
.log-debug { color: #888; }
.log-info { color: #ddd; }
.log-warning { color: #ffc107; }
.log-error { color: #ff6b6b; }
.results-table { width: 100%; border-collapse: collapse; font-size: 13px; }
.results-table th, .results-table td { padding: 6px 10px; border-bottom: 1px solid #eee; text-align: left; }
.summary-cards { display: flex; gap: 12px; margin-bottom: 12px; }
.summary-card { flex: 1; text-align: center; padding: 12px; border: 1px solid #eee; border-radius: 4px; }
.summary-card h3 { margin: 0 0 4px; font-size: 22px; }
.text-primary { color: #0d6efd; }
.text-success { color: #198754; }
.text-warning { color: #b58a00; }
.text-danger { color: #dc3545; }
.text-muted { color: #888; }
.proxy-status { padding: 2px 8px; border-radius: 10px; font-size: 12px; }
.proxy-status.full { background: #d1e7dd; color: #0f5132; }
.proxy-status.partial { background: #fff3cd; color: #664d03; }
.proxy-status.blocked { background: #f8d7da; color: #842029; }
.proxy-status.failed { background: #e2e3e5; color: #41464b; }
.proxy-status.unknown { background: #e2e3e5; color: #41464b; }
.empty-state { text-align: center; color: #888; padding: 48px 0; }
.panel-error { color: #842029; padding: 24px 0; text-align: center; }
.version-info { background: #f8f9fa; padding: 8px; font-size: 12px; }
.landing { max-width: 560px; margin: 80px auto; background: #fff; padding: 24px; border-radius: 6px; }
"#;
