//! 应用状态
//!
//! `AppState` 即会话/视图控制器：持有后端客户端、日志缓冲、
//! 状态快照与后台任务句柄，提供显式的 `start`/`stop` 生命周期，
//! 取代原面板脚本中的全局 socket 与定时器

pub mod log_buffer;

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::auth::TokenStore;
use crate::backend::models::{yaml_text_to_document, SchedulerStatus};
use crate::backend::BackendClient;
use crate::config::EnvConfig;
use crate::error::ConsoleError;
use crate::services::{log_stream, status_poller};

pub use log_buffer::LogBuffer;

/// run-now 动作结果
#[derive(Debug, PartialEq, Eq)]
pub enum RunNowOutcome {
    /// 未经确认，未发出任何请求
    NotConfirmed,
    /// 任务已开始，视图应切换到日志面板
    Started,
    /// 会话失效，应跳转登录页
    Unauthorized,
    /// 后端拒绝或网络失败，携带提示消息
    Failed(String),
}

/// 配置保存结果
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigSaveOutcome {
    /// YAML 解析失败，未发出任何请求
    InvalidYaml(String),
    /// 保存成功
    Saved,
    /// 会话失效
    Unauthorized,
    /// 后端拒绝或网络失败
    Failed(String),
}

/// 应用状态（每个控制台进程一个实例）
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// token 存储
    pub token_store: Arc<TokenStore>,
    /// 后端客户端
    pub backend: BackendClient,
    /// 日志展示缓冲
    pub log_buffer: RwLock<LogBuffer>,
    /// 调度器状态快照（轮询任务写入，页面渲染读取，last-write-wins）
    pub scheduler_status: RwLock<SchedulerStatus>,
    /// 会话级取消令牌，stop() 时终止全部后台任务
    shutdown: CancellationToken,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: EnvConfig) -> Self {
        let token_store = Arc::new(TokenStore::new(&config.token_path));
        let backend = BackendClient::new(config.backend_url.clone(), token_store.clone());

        tracing::info!(
            backend_url = %config.backend_url,
            port = config.port,
            token_path = %config.token_path.display(),
            "Loaded configuration"
        );

        Self {
            config,
            token_store,
            backend,
            log_buffer: RwLock::new(LogBuffer::new()),
            scheduler_status: RwLock::new(SchedulerStatus::default()),
            shutdown: CancellationToken::new(),
        }
    }

    /// 是否持有会话 token
    pub fn authenticated(&self) -> bool {
        self.token_store.current().is_some()
    }

    /// 启动会话：日志推送通道 + 状态轮询
    pub fn start(self: &Arc<Self>) {
        tokio::spawn(log_stream::start(self.clone()));
        tokio::spawn(status_poller::start(self.clone()));
    }

    /// 终止会话的全部后台任务
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// 会话取消令牌
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 登出：清除 token 并终止会话
    pub fn logout(&self) {
        self.token_store.clear();
        self.stop();
    }

    /// 刷新调度器状态快照
    ///
    /// 普通失败只记录日志，保留上一次快照（两次读取都是幂等快照）；
    /// 凭证失效时终止会话，轮询与日志通道随之停止
    pub async fn refresh_status(&self) {
        match self.backend.scheduler_status().await {
            Ok(status) => {
                *self.scheduler_status.write().await = status;
            }
            Err(ConsoleError::Unauthorized) => {
                tracing::warn!("Status refresh unauthorized, terminating session");
                self.stop();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh scheduler status");
            }
        }
    }

    /// 当前状态快照
    pub async fn status_snapshot(&self) -> SchedulerStatus {
        *self.scheduler_status.read().await
    }

    /// 立即执行检测任务
    ///
    /// 未确认时不发出请求；成功后刷新状态快照
    pub async fn run_now(&self, confirmed: bool) -> RunNowOutcome {
        if !confirmed {
            return RunNowOutcome::NotConfirmed;
        }

        match self.backend.run_now().await {
            Ok(()) => {
                self.refresh_status().await;
                RunNowOutcome::Started
            }
            Err(ConsoleError::Unauthorized) => {
                self.stop();
                RunNowOutcome::Unauthorized
            }
            Err(e) => RunNowOutcome::Failed(e.notice("执行失败")),
        }
    }

    /// 保存编辑后的配置文本
    ///
    /// 先在本地解析 YAML，解析失败直接返回错误消息，不访问后端
    pub async fn save_config_text(&self, text: &str) -> ConfigSaveOutcome {
        let document = match yaml_text_to_document(text) {
            Ok(document) => document,
            Err(message) => return ConfigSaveOutcome::InvalidYaml(message),
        };

        match self.backend.save_config(&document).await {
            Ok(()) => ConfigSaveOutcome::Saved,
            Err(ConsoleError::Unauthorized) => {
                self.stop();
                ConfigSaveOutcome::Unauthorized
            }
            Err(e) => ConfigSaveOutcome::Failed(e.notice("保存失败")),
        }
    }

    /// 清空本地日志视图（不触碰后端日志存储）
    pub async fn clear_logs(&self) {
        self.log_buffer.write().await.clear();
    }
}
