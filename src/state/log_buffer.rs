//! 日志展示缓冲区
//!
//! 有界 FIFO：保持到达顺序，超出上限时从头部淘汰最旧条目。
//! 上限只是展示层的内存约束，不是正确性不变量

use std::collections::VecDeque;

use crate::backend::models::LogEntry;
use crate::config::constants::LOG_BUFFER_CAP;

/// 日志缓冲区
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    cap: usize,
}

impl LogBuffer {
    /// 创建默认上限（1000 条）的缓冲区
    pub fn new() -> Self {
        Self::with_cap(LOG_BUFFER_CAP)
    }

    /// 创建指定上限的缓冲区
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap.min(LOG_BUFFER_CAP)),
            cap,
        }
    }

    /// 整体替换（日志回放）
    pub fn replace(&mut self, logs: Vec<LogEntry>) {
        self.entries.clear();
        self.append(logs);
    }

    /// 追加增量日志，超出上限时淘汰最旧条目
    pub fn append(&mut self, logs: Vec<LogEntry>) {
        for entry in logs {
            self.entries.push_back(entry);
            while self.entries.len() > self.cap {
                self.entries.pop_front();
            }
        }
    }

    /// 清空展示缓冲（只影响本地视图）
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 按到达顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}
