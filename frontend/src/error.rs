use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// API 调用失败的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorStatus {
    /// 请求未能发出或未收到响应
    Transport,
    /// 服务端返回非 2xx
    Http,
    /// 响应体无法解析为预期的 JSON
    Decode,
    /// 请求体序列化失败
    Encode,
}

impl ApiErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorStatus::Transport => "NETWORK_ERROR",
            ApiErrorStatus::Http => "HTTP_ERROR",
            ApiErrorStatus::Decode => "DECODE_ERROR",
            ApiErrorStatus::Encode => "ENCODE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.list_materias"
    pub operation: String,
    pub detail: Option<String>,
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 网关错误
///
/// - status: 错误类别
/// - http_status: 服务端状态码（仅 `Http` 类别存在）
/// - body: 原始响应体或底层错误描述
/// - spans: 调用追踪栈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: ApiErrorStatus,
    pub http_status: Option<u16>,
    pub body: String,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(status: ApiErrorStatus, body: impl Into<String>) -> Self {
        Self {
            status,
            http_status: None,
            body: body.into(),
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Transport, message)
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self {
            http_status: Some(status),
            ..Self::new(ApiErrorStatus::Http, body)
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Decode, message)
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Encode, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 服务端返回的 `detail` 字段（FastAPI 风格错误体）
    ///
    /// `detail` 为字符串时直接返回；为校验错误数组时取第一条的 `msg`。
    pub fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(|msg| msg.as_str())
                .map(str::to_string),
            _ => None,
        }
    }

    /// 是否为鉴权失败 (401/403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.http_status, Some(401) | Some(403))
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.error_code())?;
        if let Some(status) = self.http_status {
            write!(f, " {}", status)?;
        }
        if !self.body.is_empty() {
            write!(f, " {}", self.body)?;
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        let err = ApiError::http(400, r#"{"detail":"Credenciales incorrectas"}"#);
        assert_eq!(err.detail().as_deref(), Some("Credenciales incorrectas"));
    }

    #[test]
    fn test_detail_validation_array() {
        let err = ApiError::http(
            422,
            r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email","type":"x"}]}"#,
        );
        assert_eq!(err.detail().as_deref(), Some("value is not a valid email"));
    }

    #[test]
    fn test_detail_absent() {
        assert_eq!(ApiError::http(500, "Internal Server Error").detail(), None);
        assert_eq!(ApiError::transport("offline").detail(), None);
    }

    #[test]
    fn test_display_with_trace() {
        let err = ApiError::http(404, "Not Found")
            .in_op("api.list_unidades")
            .in_op_with("dashboard.select_materia", "m1");
        assert_eq!(
            err.to_string(),
            "[HTTP_ERROR] 404 Not Found | trace: api.list_unidades -> dashboard.select_materia(m1)"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::http(401, "").is_unauthorized());
        assert!(!ApiError::http(500, "").is_unauthorized());
        assert!(!ApiError::transport("x").is_unauthorized());
    }
}
