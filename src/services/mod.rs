//! 后台服务任务
//!
//! 会话启动时由 `AppState::start` 派生，`stop` 时统一取消

pub mod log_stream;
pub mod status_poller;
