//! Demo Entry Point
//!
//! Walks through a full session: restore attempt, guarded navigation,
//! login, token-carrying fetch, logout and the guard's redirect.
//! Uses `anyhow` for startup errors, but library errors are
//! `auth::AuthError` / `kernel::error::AppError`.
//!
//! Without `AUTH_BASE_URL` the demo talks to an in-memory server that
//! knows a single user, `hitmands` / `asdasd`.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::models::{Credentials, Route, RouteParams, SessionStatus};
use auth::router::Router;
use auth::{
    AuthConfig, AuthEvent, AuthService, HttpTransport, MemoryBackend, MemoryRouter, RouteGuard,
    Transport, TransportError, TransportResponse,
};
use http::{Method, StatusCode};
use kernel::error::app_error::AppError;
use platform::tick::TokioScheduler;
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_TOKEN: &str = "697b84c9c82f9abc6a80359c9125d293";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo=info,auth=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AuthConfig::from_env();
    let credentials = Credentials::new(
        env::var("AUTH_USERNAME").unwrap_or_else(|_| "hitmands".to_string()),
        env::var("AUTH_PASSWORD").unwrap_or_else(|_| "asdasd".to_string()),
    );

    match env::var("AUTH_BASE_URL") {
        Ok(base_url) => {
            tracing::info!(base_url = %base_url, "Using HTTP auth server");
            run(HttpTransport::new(base_url), config, credentials).await
        }
        Err(_) => {
            tracing::info!("AUTH_BASE_URL not set, using in-memory auth server");
            let header = config.token_header.clone();
            run(demo_backend(header), config, credentials).await
        }
    }
}

async fn run<T>(transport: T, config: AuthConfig, credentials: Credentials) -> anyhow::Result<()>
where
    T: Transport + Sync,
{
    let service = AuthService::builder(transport)
        .config(config)
        .tokenize_http(None)
        .build();

    let router = Arc::new(
        MemoryRouter::new()
            .state(Route::new("home", "/"))
            .state(Route::new("users.me", "/users/me").with_min_auth_level(100))
            .state(Route::new("admin", "/admin").with_data("minAuthLevel", 5000)),
    );
    let guard = Arc::new(RouteGuard::for_service(
        &service,
        router.clone(),
        Arc::new(TokioScheduler::new()),
    ));
    guard.install();
    let guard_task = guard.spawn();
    let event_log = log_events(service.subscribe());

    // A server-side session may still exist
    if let Err(e) = service.fetch_logged_user().await {
        tracing::info!(error = %e, "No session to restore");
    }

    // Denied while anonymous; the guard sends us home on the next tick
    router.transition_to("users.me", RouteParams::new());
    settle().await;
    tracing::info!(route = %router.current().name, "After anonymous navigation");

    if let Err(e) = service.login(&credentials).await {
        let err = AppError::from(e);
        tracing::error!(
            status = err.status_code(),
            action = err.action().unwrap_or("-"),
            "Login failed: {}",
            err.message()
        );
        return Err(anyhow::Error::new(err).context("login failed"));
    }
    let user = service
        .current_user()
        .context("login succeeded but returned no usable session")?;
    tracing::info!(
        auth_level = %user.auth_level(),
        user = %user.to_value(),
        "Signed in"
    );

    router.transition_to("users.me", RouteParams::new());
    tracing::info!(route = %router.current().name, "After signed-in navigation");

    router.transition_to("admin", RouteParams::new());
    tracing::info!(route = %router.current().name, "After admin navigation");

    service
        .fetch_logged_user()
        .await
        .context("fetching the current user failed")?;

    if let Err(e) = service.logout().await {
        tracing::warn!(error = %e, "Server logout failed");
    }
    settle().await;
    tracing::info!(
        route = %router.current().name,
        logged_in = service.is_user_logged_in(),
        "After logout"
    );

    guard_task.abort();
    event_log.abort();
    Ok(())
}

/// Give deferred redirects a chance to run
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

fn log_events(
    mut events: tokio::sync::broadcast::Receiver<AuthEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match &event {
                AuthEvent::TransitionError(rejection) => tracing::info!(
                    event = event.name(),
                    to = %rejection.to.name,
                    status = rejection.status_code,
                    "Auth event"
                ),
                AuthEvent::Update { user, .. } => {
                    let status = SessionStatus::from_user(user.clone());
                    tracing::info!(
                        event = event.name(),
                        status = %serde_json::to_string(&status).unwrap_or_default(),
                        "Auth event"
                    );
                }
                _ => tracing::info!(event = event.name(), "Auth event"),
            }
        }
    })
}

/// In-memory server with one user
fn demo_backend(token_header: http::HeaderName) -> MemoryBackend {
    fn user() -> Value {
        json!({
            "username": "Hitmands",
            "id": 1,
            "slug": "hitmands",
            "name": "Giuseppe",
            "surname": "Mandato",
            "authLevel": 1000,
            "token": DEMO_TOKEN
        })
    }

    let backend = MemoryBackend::new();
    backend
        .when(Method::POST, "/users/login", |request| {
            let body = request.body.clone().unwrap_or_default();
            if body["username"] == "hitmands" && body["password"] == "asdasd" {
                Ok(TransportResponse::ok(user()))
            } else {
                Err(TransportError::Status {
                    status: StatusCode::UNAUTHORIZED,
                    body: json!({"error": "Invalid credentials"}),
                })
            }
        })
        .when(Method::GET, "/users/me", move |request| {
            let token = request.headers.get(&token_header).and_then(|v| v.to_str().ok());
            if token == Some(DEMO_TOKEN) {
                Ok(TransportResponse::ok(user()))
            } else {
                Err(TransportError::status(StatusCode::UNAUTHORIZED))
            }
        })
        .respond(Method::POST, "/users/logout", StatusCode::OK, Value::Null);
    backend
}
