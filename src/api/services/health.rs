use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

use crate::registry::Registry;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub links_count: usize,
    pub uptime_seconds: i64,
    pub telemetry: TelemetryHealth,
}

#[derive(Debug, Serialize)]
pub struct TelemetryHealth {
    pub enabled: bool,
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

/// Health Service
///
/// 遥测失败不会让服务变为 unhealthy，只在计数中体现。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        registry: web::Data<Arc<Registry>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let telemetry = registry.telemetry();
        let stats = telemetry.stats();
        let uptime = chrono::Utc::now() - app_start_time.start_datetime;

        HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            links_count: registry.len(),
            uptime_seconds: uptime.num_seconds().max(0),
            telemetry: TelemetryHealth {
                enabled: telemetry.is_enabled(),
                delivered: stats.delivered,
                failed: stats.failed,
                dropped: stats.dropped,
            },
        })
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health").route("", web::get().to(HealthService::health_check))
}
