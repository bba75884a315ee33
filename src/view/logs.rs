//! 日志面板渲染
//!
//! 每条日志渲染为 `[本地化时间] [级别] 消息`，按级别着色

use chrono::{DateTime, Local, NaiveDateTime};

use crate::backend::models::LogEntry;

use super::escape_html;

/// 格式化时间戳为本地化展示
///
/// 依次尝试 RFC3339 与无时区 ISO 格式（后端两种都可能发），
/// 都失败时原样展示
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive
            .and_utc()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }
    raw.to_string()
}

/// 单条日志行
pub fn render_log_line(entry: &LogEntry) -> String {
    let level_class = format!("log-{}", entry.level.to_lowercase());
    format!(
        r#"<div class="{class}">[{timestamp}] [{level}] {message}</div>"#,
        class = escape_html(&level_class),
        timestamp = escape_html(&format_timestamp(&entry.timestamp)),
        level = escape_html(&entry.level),
        message = escape_html(&entry.message),
    )
}

/// 日志面板
pub fn render_logs_panel<'a>(entries: impl Iterator<Item = &'a LogEntry>) -> String {
    let lines: String = entries.map(|e| render_log_line(e)).collect();
    format!(
        r#"<div class="panel-actions">
  <form method="post" action="/console/logs/clear" onsubmit="return confirm('确定要清空日志吗？')">
    <input type="hidden" name="confirm" value="yes">
    <button class="btn">清空日志</button>
  </form>
  <a class="btn" href="/console?tab=logs">刷新</a>
</div>
<div class="log-view">{lines}</div>"#,
        lines = lines,
    )
}
