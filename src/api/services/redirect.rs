use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::trace;

use crate::config::try_get_config;
use crate::errors::LinkpulseError;
use crate::registry::{ClickContext, Registry};
use crate::utils::ip::extract_client_ip;
use crate::utils::is_valid_short_code;

use super::helpers::error_response;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        registry: web::Data<Arc<Registry>>,
    ) -> impl Responder {
        let code = path.into_inner();

        // 非法短码直接 404，不进注册表也不产生遥测
        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {}", code);
            return error_response(&LinkpulseError::not_found(format!(
                "Shortcode '{}' not found",
                code
            )));
        }

        let referrer = req
            .headers()
            .get(header::REFERER)
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        let origin = extract_client_ip(&req, Self::trust_forwarded_for());

        match registry.resolve(&code, ClickContext::new(referrer, origin)) {
            Ok(target) => HttpResponse::Found()
                .insert_header((header::LOCATION, target))
                .finish(),
            Err(e) => error_response(&e),
        }
    }

    fn trust_forwarded_for() -> bool {
        try_get_config().is_some_and(|config| config.server.trust_forwarded_for)
    }
}

/// Redirect 路由配置，必须最后注册
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("").route("/{code}", web::get().to(RedirectService::handle_redirect))
}
