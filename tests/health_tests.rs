use actix_web::{web, App, HttpServer};
use chrono::{DateTime, Utc};
use portfolio_contact::{routes::configure_routes, settings::AppConfig, AppState};
use serde_json::Value;
use std::{net::TcpListener, time::Duration};

// Runs in its own binary so nothing else has read the start time yet. The
// listener is bound up front, so no readiness request is needed.
#[actix_rt::test]
async fn uptime_counts_from_startup_not_first_health_call() {
    let state = web::Data::new(AppState::new(&AppConfig::default()).unwrap());
    let started = Utc::now();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure_routes))
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();
    actix_rt::spawn(server);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let body: Value = reqwest::get(format!("{}/health", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let start_at: DateTime<Utc> = body["start_at"].as_str().unwrap().parse().unwrap();
    assert!(start_at <= started, "start_at {start_at} is after startup {started}");
    assert_ne!(body["uptime"], "0s");
}
