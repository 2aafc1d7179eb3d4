use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_incident::create_incident;
use super::handlers::get_incident::get_incident;
use super::handlers::list_incidents::list_incidents;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::authenticate;
use crate::domain::incident::ports::IncidentServicePort;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub incident_service: Arc<dyn IncidentServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    incident_service: Arc<dyn IncidentServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        auth_service,
        incident_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let protected_routes = Router::new()
        .route("/incidents", post(create_incident).get(list_incidents))
        .route("/incidents/:incident_id", get(get_incident))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Browsers reject a wildcard origin on credentialed requests, so the
    // request origin is mirrored instead.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
