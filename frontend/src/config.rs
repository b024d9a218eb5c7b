//! 应用配置
//!
//! API 基础地址在构建时确定：设置 `EDUWEB_API_BASE` 环境变量可覆盖默认值。

use eduweb_shared::protocol::Endpoint;

// =========================================================
// 常量定义
// =========================================================

const DEFAULT_API_BASE: &str = "https://aplicacioneduwebapi.onrender.com/api/v1/";

/// 通知横幅自动消失的时间（毫秒）
pub const NOTICE_TIMEOUT_MS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// 以且仅以一个 `/` 结尾
    pub api_base: String,
}

impl AppConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let api_base = format!("{}/", api_base.trim().trim_end_matches('/'));
        Self { api_base }
    }

    /// 读取构建时环境变量，缺省使用公开部署地址
    pub fn from_build_env() -> Self {
        Self::new(option_env!("EDUWEB_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }

    /// 拼接端点的完整 URL
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.api_base, endpoint.path())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
