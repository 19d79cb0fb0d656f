use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::JwtHandler;
use auth::TokenIssuer;
use chrono::Duration;
use identity_service::domain::identity::errors::MailerError;
use identity_service::domain::identity::models::EmailAddress;
use identity_service::domain::identity::ports::Mailer;
use identity_service::domain::identity::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserRepository;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-at-least-32-bytes!";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-at-least-32-byte!";
pub const FRONTEND_BASE: &str = "http://localhost:5173";

/// Mailer that records every dispatched reset link so tests can fish the
/// opaque token back out.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Token embedded in the most recently dispatched reset link.
    pub fn last_reset_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .and_then(|(_, link)| link.split("token=").nth(1).map(|t| t.to_string()))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_reset_link(&self, to: &EmailAddress, link: &str) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_string(), link.to_string()));
        Ok(())
    }
}

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub mailer: RecordingMailer,
    pub access_jwt: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let tokens = Arc::new(TokenIssuer::new(
            ACCESS_SECRET,
            REFRESH_SECRET,
            Duration::minutes(15),
            Duration::days(7),
        ));

        let repository = Arc::new(InMemoryUserRepository::new());
        let mailer = RecordingMailer::new();

        let identity_service = Arc::new(IdentityService::new(
            repository,
            Arc::new(mailer.clone()),
            tokens,
            FRONTEND_BASE.to_string(),
        ));

        let router = create_router(identity_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            mailer,
            access_jwt: JwtHandler::new(ACCESS_SECRET),
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Register a user, returning the created user's id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute register request");
        assert_eq!(response.status().as_u16(), 201);

        let body: serde_json::Value = response.json().await.expect("Invalid register body");
        body["data"]["user"]["id"]
            .as_str()
            .expect("Missing user id")
            .to_string()
    }

    /// Login, returning `(access_token, refresh_token)`.
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value = response.json().await.expect("Invalid login body");
        (
            body["data"]["accessToken"]
                .as_str()
                .expect("Missing access token")
                .to_string(),
            body["data"]["refreshToken"]
                .as_str()
                .expect("Missing refresh token")
                .to_string(),
        )
    }
}
