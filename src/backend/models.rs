//! 后端响应模型
//!
//! 纯数据类型，无 tokio/axum 依赖。后端字段可能缺失或形态不符，
//! 因此模型整体从宽：可缺省字段一律 `Option`/`default`，
//! 配置文档保持 `serde_json::Value` 不做任何模式校验

use serde::{Deserialize, Serialize};

/// 日志条目
///
/// 时间戳保持原始字符串，展示时再尝试解析本地化（后端可能发
/// 不带时区的 ISO 格式）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub message: String,
}

/// 日志推送通道消息
///
/// 客户端连接后发送 `join_logs`，服务端推送 `logs_history`（一次性回放）
/// 与 `new_logs`（增量）
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum LogStreamMessage {
    JoinLogs,
    LogsHistory { logs: Vec<LogEntry> },
    NewLogs { logs: Vec<LogEntry> },
}

/// 调度器状态快照
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SchedulerStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub task_running: bool,
}

/// GET /api/scheduler/status 响应
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: SchedulerStatus,
}

/// GET /api/config 响应，配置文档对控制台完全不透明
#[derive(Debug, Deserialize)]
pub struct ConfigResponse {
    pub config: serde_json::Value,
}

/// 检测结果汇总
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResultSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub full: u64,
    #[serde(default)]
    pub partial: u64,
    #[serde(default)]
    pub blocked: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub check_time: String,
}

/// 单条检测结果
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub proxy_type: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
    /// full / partial / blocked / failed，其余值展示为“未知”
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub details: String,
}

/// 检测结果集
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub summary: ResultSummary,
    #[serde(default)]
    pub results: Vec<ResultItem>,
}

/// GET /api/results 响应，无结果时 results 为 null
#[derive(Debug, Deserialize)]
pub struct ResultsResponse {
    #[serde(default)]
    pub results: Option<ResultSet>,
}

/// 版本信息
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub mihomo_info: Option<String>,
}

/// GET /api/version 响应
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub version: VersionInfo,
}

/// 将编辑器中的 YAML 文本解析为 JSON 配置文档
///
/// 解析失败返回错误消息（不发起任何网络请求）；YAML 中出现
/// 无法表示为 JSON 的结构（如非字符串键）同样视为格式错误
pub fn yaml_text_to_document(text: &str) -> Result<serde_json::Value, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    serde_json::to_value(&value).map_err(|e| e.to_string())
}

/// 将配置文档转为 YAML 文本用于编辑器展示
pub fn document_to_yaml(doc: &serde_json::Value) -> String {
    serde_yaml::to_string(doc).unwrap_or_default()
}
