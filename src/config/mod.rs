//! 环境变量配置加载

use std::env;
use std::path::PathBuf;

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 后端服务地址（Netflix Checker 所在服务）
    pub backend_url: String,
    /// 控制台本地监听端口
    pub port: u16,
    /// Bearer token 存放路径（由外部登录流程写入）
    pub token_path: PathBuf,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let backend_url = env::var("NETFLIX_CONSOLE_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let port = env::var("NETFLIX_CONSOLE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(9810);

        let token_path = env::var("NETFLIX_CONSOLE_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_path());

        Self {
            backend_url: normalize_base_url(&backend_url),
            port,
            token_path,
        }
    }

    /// 日志推送 WebSocket 地址
    ///
    /// 由后端 HTTP 地址派生：http -> ws, https -> wss
    pub fn ws_logs_url(&self) -> String {
        let base = if let Some(rest) = self.backend_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.backend_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            format!("ws://{}", self.backend_url)
        };
        format!("{}/ws/logs", base)
    }
}

/// 默认 token 路径：<config_dir>/netflix-console/token
fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("netflix-console")
        .join("token")
}

/// 去掉末尾的斜杠，避免拼接出双斜杠路径
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// 常量
pub mod constants {
    /// 状态轮询间隔（秒）
    pub const STATUS_POLL_INTERVAL_SECS: u64 = 5;

    /// 日志展示缓冲区上限（条）
    pub const LOG_BUFFER_CAP: usize = 1000;

    /// 出站 HTTP 请求超时（秒）
    pub const HTTP_TIMEOUT_SECS: u64 = 30;

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_logs_url_http() {
        let config = EnvConfig {
            backend_url: "http://localhost:8080".to_string(),
            port: 9810,
            token_path: PathBuf::from("/tmp/token"),
        };
        assert_eq!(config.ws_logs_url(), "ws://localhost:8080/ws/logs");
    }

    #[test]
    fn test_ws_logs_url_https() {
        let config = EnvConfig {
            backend_url: "https://checker.example.com".to_string(),
            port: 9810,
            token_path: PathBuf::from("/tmp/token"),
        };
        assert_eq!(config.ws_logs_url(), "wss://checker.example.com/ws/logs");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://a:1/"), "http://a:1");
        assert_eq!(normalize_base_url("http://a:1"), "http://a:1");
    }
}
