//! 后端交互模块
//!
//! HTTP 客户端、响应模型与下载辅助

pub mod client;
pub mod download;
pub mod models;

pub use client::BackendClient;
