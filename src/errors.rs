use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkpulseError {
    InvalidInput(String),
    CodeConflict(String),
    NotFound(String),
    Expired(String),
    TelemetryDelivery(String),
    Config(String),
}

impl LinkpulseError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkpulseError::InvalidInput(_) => "E001",
            LinkpulseError::CodeConflict(_) => "E002",
            LinkpulseError::NotFound(_) => "E003",
            LinkpulseError::Expired(_) => "E004",
            LinkpulseError::TelemetryDelivery(_) => "E005",
            LinkpulseError::Config(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkpulseError::InvalidInput(_) => "Invalid Input",
            LinkpulseError::CodeConflict(_) => "Code Conflict",
            LinkpulseError::NotFound(_) => "Not Found",
            LinkpulseError::Expired(_) => "Link Expired",
            LinkpulseError::TelemetryDelivery(_) => "Telemetry Delivery Failure",
            LinkpulseError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkpulseError::InvalidInput(msg) => msg,
            LinkpulseError::CodeConflict(msg) => msg,
            LinkpulseError::NotFound(msg) => msg,
            LinkpulseError::Expired(msg) => msg,
            LinkpulseError::TelemetryDelivery(msg) => msg,
            LinkpulseError::Config(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    ///
    /// `TelemetryDelivery` 从不返回给调用方，这里的映射只为完整性。
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkpulseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LinkpulseError::CodeConflict(_) => StatusCode::CONFLICT,
            LinkpulseError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkpulseError::Expired(_) => StatusCode::GONE,
            LinkpulseError::TelemetryDelivery(_) => StatusCode::BAD_GATEWAY,
            LinkpulseError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkpulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkpulseError {}

// 便捷的构造函数
impl LinkpulseError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::InvalidInput(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::CodeConflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::Expired(msg.into())
    }

    pub fn telemetry_delivery<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::TelemetryDelivery(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::Config(msg.into())
    }
}

impl From<config::ConfigError> for LinkpulseError {
    fn from(err: config::ConfigError) -> Self {
        LinkpulseError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkpulseError>;
