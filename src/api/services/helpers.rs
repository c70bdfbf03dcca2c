//! API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::api::constants::MAX_JSON_PAYLOAD;
use crate::errors::LinkpulseError;

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub error: &'a str,
}

/// 从 LinkpulseError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_response(err: &LinkpulseError) -> HttpResponse {
    HttpResponse::build(err.http_status())
        .insert_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            code: err.code(),
            error: err.message(),
        })
}

/// 请求体解析失败（缺字段类型错误、非 JSON 等）统一映射为 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let invalid = LinkpulseError::invalid_input(format!("Invalid request body: {}", err));
    InternalError::from_response(err, error_response(&invalid)).into()
}
