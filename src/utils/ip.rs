//! 客户端地址提取
//!
//! 默认使用 TCP 对端地址；只有显式开启 `server.trust_forwarded_for`
//! 时才读取 X-Forwarded-For / X-Real-IP（否则可被客户端伪造）。

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 提取点击来源地址，拿不到时返回 None
pub fn extract_client_ip(req: &HttpRequest, trust_forwarded_for: bool) -> Option<String> {
    if trust_forwarded_for && let Some(forwarded) = forwarded_ip(req.headers()) {
        return Some(forwarded);
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

/// X-Forwarded-For 取第一跳（原始客户端），其次 X-Real-IP
pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .map(String::from)
}
