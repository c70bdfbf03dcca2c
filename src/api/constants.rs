//! API 模块常量定义

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 创建接口请求体上限
pub const MAX_JSON_PAYLOAD: usize = 16 * 1024;
