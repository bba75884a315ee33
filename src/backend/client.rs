//! 后端 HTTP Client
//!
//! 封装与 Netflix Checker 后端的所有 HTTP 交互，复用连接池。
//! 所有 REST 调用都经过 `request` 这一个入口：统一注入认证头，
//! 统一处理 401（清除 token 并向上返回 `Unauthorized`）

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use tracing::warn;

use crate::auth::{auth_headers, merge_headers, TokenStore};
use crate::config::constants::HTTP_TIMEOUT_SECS;
use crate::error::{ConsoleError, ConsoleResult, ErrorBody};

use super::download::filename_from_content_disposition;
use super::models::{
    ConfigResponse, ResultSet, ResultsResponse, SchedulerStatus, StatusResponse, VersionInfo,
    VersionResponse,
};

/// 下载到内存的结果文件
#[derive(Debug)]
pub struct ResultsDownload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 后端客户端
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    token_store: Arc<TokenStore>,
}

impl BackendClient {
    /// 创建新的后端客户端
    pub fn new(base_url: impl Into<String>, token_store: Arc<TokenStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            token_store,
        }
    }

    /// 统一请求入口
    ///
    /// 合并认证头与调用方头（调用方覆盖同名头），发出请求。
    /// 后端返回 401 时清除 token 并返回 `Unauthorized`，
    /// 调用方视为“已处理，只需跳转登录页”；网络错误原样上抛
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: HeaderMap,
    ) -> ConsoleResult<Response> {
        let token = self
            .token_store
            .current()
            .ok_or(ConsoleError::Unauthorized)?;

        let url = format!("{}{}", self.base_url, path);
        let merged = merge_headers(auth_headers(&token), &headers);

        let mut request = self.client.request(method, &url).headers(merged);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Backend request failed");
            ConsoleError::Network(e)
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Backend rejected token, clearing session");
            self.token_store.clear();
            return Err(ConsoleError::Unauthorized);
        }

        Ok(response)
    }

    /// 获取配置文档（不透明 JSON）
    pub async fn fetch_config(&self) -> ConsoleResult<serde_json::Value> {
        let response = self
            .request(Method::GET, "/api/config", None, HeaderMap::new())
            .await?;
        let response = Self::ensure_ok(response).await?;
        let body: ConfigResponse = response.json().await?;
        Ok(body.config)
    }

    /// 保存配置文档
    pub async fn save_config(&self, document: &serde_json::Value) -> ConsoleResult<()> {
        let response = self
            .request(Method::POST, "/api/config", Some(document), HeaderMap::new())
            .await?;
        Self::ensure_ok(response).await?;
        Ok(())
    }

    /// 启动调度器
    pub async fn start_scheduler(&self) -> ConsoleResult<()> {
        self.post_empty("/api/scheduler/start").await
    }

    /// 停止调度器
    pub async fn stop_scheduler(&self) -> ConsoleResult<()> {
        self.post_empty("/api/scheduler/stop").await
    }

    /// 立即执行一次检测任务
    pub async fn run_now(&self) -> ConsoleResult<()> {
        self.post_empty("/api/scheduler/run-now").await
    }

    /// 获取调度器状态
    pub async fn scheduler_status(&self) -> ConsoleResult<SchedulerStatus> {
        let response = self
            .request(Method::GET, "/api/scheduler/status", None, HeaderMap::new())
            .await?;
        let response = Self::ensure_ok(response).await?;
        let body: StatusResponse = response.json().await?;
        Ok(body.status)
    }

    /// 获取最近一次检测结果，无结果时返回 None
    pub async fn fetch_results(&self) -> ConsoleResult<Option<ResultSet>> {
        let response = self
            .request(Method::GET, "/api/results", None, HeaderMap::new())
            .await?;
        let response = Self::ensure_ok(response).await?;
        let body: ResultsResponse = response.json().await?;
        Ok(body.results)
    }

    /// 下载原始结果文件
    ///
    /// 文件名取自 Content-Disposition，缺失时使用默认名
    pub async fn download_results(&self) -> ConsoleResult<ResultsDownload> {
        let response = self
            .request(Method::GET, "/api/results/download", None, HeaderMap::new())
            .await?;
        let response = Self::ensure_ok(response).await?;

        let filename = filename_from_content_disposition(
            response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(ResultsDownload {
            filename,
            content_type,
            bytes,
        })
    }

    /// 获取版本信息
    pub async fn fetch_version(&self) -> ConsoleResult<VersionInfo> {
        let response = self
            .request(Method::GET, "/api/version", None, HeaderMap::new())
            .await?;
        let response = Self::ensure_ok(response).await?;
        let body: VersionResponse = response.json().await?;
        Ok(body.version)
    }

    /// 无请求体的 POST 动作
    async fn post_empty(&self, path: &str) -> ConsoleResult<()> {
        let response = self
            .request(Method::POST, path, None, HeaderMap::new())
            .await?;
        Self::ensure_ok(response).await?;
        Ok(())
    }

    /// 非 2xx 响应转换为业务错误，提取响应体中的 error 字段
    async fn ensure_ok(response: Response) -> ConsoleResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.message))
            .unwrap_or_default();

        Err(ConsoleError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}
