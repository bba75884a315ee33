//! 结果面板渲染
//!
//! 汇总数字按后端给出的值展示，本层不做聚合计算；
//! “不可用”一格是展示层的 blocked+failed 之和（与原面板一致）。
//! `name` 与 `details` 是自由文本，插入前转义；其余字段来自
//! 枚举值或格式化数字，原样插入

use crate::backend::models::{ResultItem, ResultSet};

use super::escape_html;
use super::logs::format_timestamp;

/// 状态值映射为固定的 样式+文案 组合，未知值降级展示
pub fn status_label(status: &str) -> (&'static str, &'static str) {
    match status {
        "full" => ("full", "完全解锁"),
        "partial" => ("partial", "部分解锁"),
        "blocked" => ("blocked", "被封锁"),
        "failed" => ("failed", "失败"),
        _ => ("unknown", "未知"),
    }
}

/// 单行视图模型（纯转换，便于脱离 HTML 断言）
#[derive(Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub proxy_type: String,
    pub server: String,
    pub status_class: &'static str,
    pub status_label: &'static str,
    pub region: String,
    pub details: String,
}

/// API 响应条目 -> 行视图模型
pub fn result_row(item: &ResultItem) -> ResultRow {
    let (status_class, status_label) = status_label(&item.status);
    ResultRow {
        name: item.name.clone(),
        proxy_type: item.proxy_type.clone().unwrap_or_else(|| "-".to_string()),
        server: item.server.clone().unwrap_or_else(|| "-".to_string()),
        status_class,
        status_label,
        region: item.region.clone().unwrap_or_else(|| "-".to_string()),
        details: item.details.clone(),
    }
}

/// 结果面板；结果集缺失时渲染空态占位
pub fn render_results_panel(results: Option<&ResultSet>) -> String {
    let Some(set) = results else {
        return r#"<div class="empty-state"><p>暂无检测结果</p></div>"#.to_string();
    };

    let summary = &set.summary;
    let unavailable = summary.blocked + summary.failed;

    let mut html = format!(
        r#"<h3>检测概况</h3>
<div class="summary-cards">
  <div class="summary-card"><h3 class="text-primary">{total}</h3><span class="text-muted">总计</span></div>
  <div class="summary-card"><h3 class="text-success">{full}</h3><span class="text-muted">完全解锁</span></div>
  <div class="summary-card"><h3 class="text-warning">{partial}</h3><span class="text-muted">部分解锁</span></div>
  <div class="summary-card"><h3 class="text-danger">{unavailable}</h3><span class="text-muted">不可用</span></div>
</div>
<p class="text-muted">检测时间: {check_time}</p>
<table class="results-table">
<thead><tr><th>代理名称</th><th>类型</th><th>服务器</th><th>状态</th><th>地区</th><th>详情</th></tr></thead>
<tbody>
"#,
        total = summary.total,
        full = summary.full,
        partial = summary.partial,
        unavailable = unavailable,
        check_time = escape_html(&format_timestamp(&summary.check_time)),
    );

    for item in &set.results {
        let row = result_row(item);
        html.push_str(&format!(
            r#"<tr><td>{name}</td><td>{proxy_type}</td><td>{server}</td><td><span class="proxy-status {status_class}">{status_label}</span></td><td>{region}</td><td>{details}</td></tr>
"#,
            name = escape_html(&row.name),
            proxy_type = row.proxy_type,
            server = row.server,
            status_class = row.status_class,
            status_label = row.status_label,
            region = row.region,
            details = escape_html(&row.details),
        ));
    }

    html.push_str("</tbody>\n</table>");
    html
}
