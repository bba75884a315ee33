//! 统一错误处理
//!
//! 提供 `ConsoleError` 枚举，所有与后端交互的操作统一返回此类型

use thiserror::Error;

/// 后端返回的错误响应体
///
/// 后端业务错误统一为 `{"error": "..."}`，部分接口额外带 `message`
#[derive(Debug, serde::Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// 控制台统一错误类型
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// 认证失败（无 token 或后端返回 401）
    ///
    /// 返回此错误时 token 已被清除，调用方只需重定向到登录页
    #[error("unauthorized")]
    Unauthorized,

    /// 后端业务错误（非 2xx 响应）
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// 网络层错误
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ConsoleError {
    /// 转换为用户可见的提示消息
    ///
    /// 后端业务错误原样展示 `error` 字段内容，其余情况回退到通用文案
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            ConsoleError::Backend { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// 便捷类型别名
pub type ConsoleResult<T> = Result<T, ConsoleError>;
