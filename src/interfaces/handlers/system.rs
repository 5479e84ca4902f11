use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: &'static str,
    mailer: &'static str,
    rate_limit_buckets: usize,
}

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Portfolio contact API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        uptime: format_duration(Duration::from_secs(uptime)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        mailer: if state.contact_handler.is_configured() { "configured" } else { "not configured" },
        rate_limit_buckets: state.contact_handler.limiter.len(),
    })
}
