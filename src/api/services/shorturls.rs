//! 短链创建与统计接口

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use std::sync::Arc;
use tracing::trace;

use crate::errors::LinkpulseError;
use crate::registry::{CreateLink, Registry};

use super::helpers::{error_response, json_config};

/// `POST /shorturls` 请求体
///
/// 字段类型不对（例如 `url` 不是字符串）时由 JsonConfig 直接返回 400。
#[derive(Debug, Deserialize)]
pub struct CreateShortUrlRequest {
    pub url: Option<String>,
    /// 有效期（分钟）
    pub validity: Option<u32>,
    pub shortcode: Option<String>,
}

pub struct ShortUrlService;

impl ShortUrlService {
    pub async fn create(
        registry: web::Data<Arc<Registry>>,
        body: web::Json<CreateShortUrlRequest>,
    ) -> impl Responder {
        let body = body.into_inner();
        trace!("Create short URL request: {:?}", body);

        let Some(url) = body.url else {
            return error_response(&LinkpulseError::invalid_input("Invalid or missing URL"));
        };

        // 空字符串等同于未指定；URL 与短码格式、保留字由 Registry 校验
        let shortcode = body.shortcode.filter(|code| !code.is_empty());

        match registry.create(CreateLink {
            url,
            validity_minutes: body.validity,
            shortcode,
        }) {
            Ok(created) => HttpResponse::Created().json(created),
            Err(e) => error_response(&e),
        }
    }

    pub async fn stats(
        registry: web::Data<Arc<Registry>>,
        path: web::Path<String>,
    ) -> impl Responder {
        let code = path.into_inner();
        match registry.stats(&code) {
            Ok(stats) => HttpResponse::Ok().json(stats),
            Err(e) => error_response(&e),
        }
    }
}

/// `/shorturls` 路由配置
pub fn shorturl_routes() -> actix_web::Scope {
    web::scope("/shorturls")
        .app_data(json_config())
        .route("", web::post().to(ShortUrlService::create))
        .route("/{code}", web::get().to(ShortUrlService::stats))
}
