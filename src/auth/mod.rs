//! Token 存取与认证头构建
//!
//! token 由外部登录流程写入单个文件，控制台启动时读取一次并缓存；
//! 登出或后端返回 401 时清除文件与缓存

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Bearer token 存储
///
/// 对应浏览器端的 localStorage 单键存储：读多写少，
/// 清除后所有后续请求立即失去凭证
pub struct TokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl TokenStore {
    /// 创建存储并立即加载一次 token 文件
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = read_token_file(&path);
        if cached.is_some() {
            tracing::info!(path = %path.display(), "Loaded auth token");
        } else {
            tracing::warn!(path = %path.display(), "No auth token found");
        }
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    /// 当前 token（启动时加载的缓存值）
    pub fn current(&self) -> Option<String> {
        self.cached.read().expect("token lock poisoned").clone()
    }

    /// 写入 token（供外部登录流程复用）
    pub fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        *self.cached.write().expect("token lock poisoned") = Some(token.to_string());
        Ok(())
    }

    /// 清除 token（登出 / 401）
    ///
    /// 文件删除失败只记录日志，缓存一定被清空
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove token file");
            }
        }
        *self.cached.write().expect("token lock poisoned") = None;
        tracing::info!("Auth token cleared");
    }

    /// token 文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 读取 token 文件，空白内容视为无 token
fn read_token_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let token = content.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// 构建共享认证头：Authorization: Bearer <token> + Content-Type: application/json
pub fn auth_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(AUTHORIZATION, value);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// 合并请求头，`overrides` 中的同名头覆盖 `base`
pub fn merge_headers(mut base: HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    for (name, value) in overrides {
        base.insert(name.clone(), value.clone());
    }
    base
}
