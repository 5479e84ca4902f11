#![allow(dead_code)]

use actix_web::{
    middleware::NormalizePath,
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use portfolio_contact::{
    entities::notification::OutboundEmail,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use reqwest::Client;
use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};

pub const TEST_API_KEY: &str = "re_test_key_1234567890";
pub const OWNER_EMAIL: &str = "owner@example.com";

/// One request as seen by the fake email API.
#[derive(Debug, Clone)]
pub struct RecordedEmail {
    pub authorization: Option<String>,
    pub email: OutboundEmail,
}

#[derive(Clone)]
struct FakeEmailState {
    status: u16,
    received: Arc<Mutex<Vec<RecordedEmail>>>,
}

/// Stand-in for the transactional email API. Answers every request with a
/// fixed status and keeps what it was sent.
pub struct FakeEmailApi {
    pub address: String,
    received: Arc<Mutex<Vec<RecordedEmail>>>,
}

impl FakeEmailApi {
    pub async fn spawn(status: u16) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = FakeEmailState {
            status,
            received: received.clone(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake email API");
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/emails", web::post().to(receive_email))
        })
        .listen(listener)
        .expect("Failed to start fake email API")
        .workers(1)
        .run();

        actix_rt::spawn(server);

        Self {
            address: format!("http://127.0.0.1:{}", port),
            received,
        }
    }

    pub fn emails_url(&self) -> String {
        format!("{}/emails", self.address)
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<RecordedEmail> {
        self.received.lock().unwrap().clone()
    }
}

async fn receive_email(
    req: HttpRequest,
    state: web::Data<FakeEmailState>,
    body: web::Json<OutboundEmail>,
) -> HttpResponse {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.received.lock().unwrap().push(RecordedEmail {
        authorization,
        email: body.into_inner(),
    });

    let status = actix_web::http::StatusCode::from_u16(state.status).unwrap();
    if status.is_success() {
        HttpResponse::build(status).json(serde_json::json!({ "id": "test-email-id" }))
    } else {
        HttpResponse::build(status).json(serde_json::json!({
            "name": "application_error",
            "message": "Something went wrong upstream"
        }))
    }
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub email_api: FakeEmailApi,
}

impl TestApp {
    /// Contact API wired to a fake email API that answers with `upstream_status`.
    pub async fn spawn(upstream_status: u16) -> Self {
        let email_api = FakeEmailApi::spawn(upstream_status).await;
        let config = test_config(&email_api);
        Self::spawn_with(config, email_api).await
    }

    /// Contact API with no mail credentials at all.
    pub async fn spawn_unconfigured() -> Self {
        let email_api = FakeEmailApi::spawn(200).await;
        let config = AppConfig {
            resend_api_key: None,
            contact_to_email: None,
            ..test_config(&email_api)
        };
        Self::spawn_with(config, email_api).await
    }

    async fn spawn_with(config: AppConfig, email_api: FakeEmailApi) -> Self {
        let state = web::Data::new(AppState::new(&config).expect("Failed to build app state"));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        actix_rt::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            address,
            client,
            email_api,
        }
    }

    pub async fn post_contact(&self, body: &serde_json::Value, client_ip: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.address))
            .header("X-Forwarded-For", client_ip)
            .json(body)
            .send()
            .await
            .expect("Failed to post contact form")
    }
}

fn test_config(email_api: &FakeEmailApi) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Contact Test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        worker_count: 1,
        cors_allowed_origins: vec!["*".to_string()],
        resend_api_key: Some(TEST_API_KEY.into()),
        resend_api_url: email_api.emails_url(),
        contact_to_email: Some(OWNER_EMAIL.into()),
        contact_from_email: "Portfolio Contact <onboarding@resend.dev>".into(),
        mail_timeout_secs: 5,
    }
}
