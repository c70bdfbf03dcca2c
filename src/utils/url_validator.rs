//! 目标 URL 校验
//!
//! 由 `Registry::create` 在入库前调用。

use url::Url;

use crate::errors::{LinkpulseError, Result};

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// 校验目标地址是合法的绝对 http(s) URL
///
/// 返回解析后的 URL；Registry 保存的是去掉首尾空白后的原始字符串，不做规范化。
/// URL 解析器会静默剥离控制字符，而原始字符串会原样写进 `Location` 头，
/// 所以含控制字符的输入必须在这里拒绝。
pub fn validate_target_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LinkpulseError::invalid_input("Invalid or missing URL"));
    }

    if raw.chars().any(|c| c.is_ascii_control()) {
        return Err(LinkpulseError::invalid_input(
            "URL must not contain control characters",
        ));
    }

    let url = Url::parse(raw)
        .map_err(|e| LinkpulseError::invalid_input(format!("Invalid URL '{}': {}", raw, e)))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(LinkpulseError::invalid_input(format!(
            "Unsupported URL scheme '{}': only http and https are allowed",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(LinkpulseError::invalid_input(format!(
            "URL '{}' has no host",
            raw
        )));
    }

    Ok(url)
}
