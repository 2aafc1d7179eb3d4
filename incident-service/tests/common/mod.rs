// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use incident_service::domain::incident::ports::IncidentServicePort;
use incident_service::domain::incident::service::IncidentService;
use incident_service::domain::user::ports::AuthServicePort;
use incident_service::domain::user::service::AuthService;
use incident_service::inbound::http::router::create_router;
use incident_service::outbound::repositories::InMemoryIncidentRepository;
use incident_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application over in-memory stores and return TestApp
    pub async fn spawn() -> Self {
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&authenticator),
        ));
        let incident_service = Arc::new(IncidentService::new(Arc::new(
            InMemoryIncidentRepository::new(),
        )));

        Self::spawn_with(auth_service, incident_service, authenticator).await
    }

    /// Spawn the application over the given services in a background task
    pub async fn spawn_with(
        auth_service: Arc<dyn AuthServicePort>,
        incident_service: Arc<dyn IncidentServicePort>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(auth_service, incident_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account and return the response body
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/register")
            .json(&json!({
                "nombre": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and return its token
    pub async fn register_and_get_token(&self, email: &str) -> String {
        let response = self.register("Ana", email, "pass_word!").await;
        let body: Value = response.json().await.expect("Failed to parse response");

        body["data"]["token"]
            .as_str()
            .expect("Missing token in response")
            .to_string()
    }

    /// File an incident and return the response
    pub async fn create_incident(&self, token: &str, incident: Value) -> reqwest::Response {
        self.post_authenticated("/incidents", token)
            .json(&incident)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A complete incident body of the given type
pub fn incident_body(title: &str, incident_type: &str) -> Value {
    json!({
        "titulo": title,
        "descripcion": "Descripcion del incidente",
        "tipo": incident_type,
        "piso": 2,
        "lugar_especifico": "Aula A201"
    })
}
