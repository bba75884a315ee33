//! 调度器状态轮询
//!
//! 固定 5 秒间隔拉取 /api/scheduler/status 并更新共享快照。
//! 无退避、无并发去重：慢响应与下一次 tick 可能交错，
//! 两次写入都是幂等快照，last-write-wins 即可

use std::sync::Arc;
use std::time::Duration;

use crate::config::constants::STATUS_POLL_INTERVAL_SECS;
use crate::state::AppState;

/// 启动状态轮询任务
///
/// 首个 tick 立即触发（页面加载即有一次状态刷新），
/// 之后每个间隔刷新一次，直到会话取消
pub async fn start(state: Arc<AppState>) {
    let shutdown = state.shutdown_token();
    let mut interval = tokio::time::interval(Duration::from_secs(STATUS_POLL_INTERVAL_SECS));

    tracing::info!(
        interval_secs = STATUS_POLL_INTERVAL_SECS,
        "Starting scheduler status poller"
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Status poller stopped");
                break;
            }
            _ = interval.tick() => {
                state.refresh_status().await;
            }
        }
    }
}
