use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use std::{panic, process, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::repos::{CredentialStore, PgCredentialRepo};
use crate::services::auth::{Authenticator, JwtIssuer, TokenIssuer};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,auth=debug cargo run -p auth
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting token issuer in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "bind failed");
            AppError::Internal
        })?;
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!(error = %e, "server error");
        AppError::Internal
    })?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState, AppError> {
    // schema is migrated by the resource server
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database connection failed");
            AppError::Internal
        })?;
    let credentials: Arc<dyn CredentialStore> = Arc::new(PgCredentialRepo::new(pool));

    let jwt = JwtIssuer::new(
        &config.jwt_secret,
        config.issuer.clone(),
        config.audience.clone(),
        config.access_token_ttl_seconds,
    );

    Ok(AppState::new(
        Arc::new(Authenticator::new(credentials)),
        Arc::new(TokenIssuer::new(jwt)),
    ))
}

fn build_router(state: AppState) -> Router {
    async fn health() -> &'static str {
        "ok"
    }

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::credential_repo::CredentialRow;
    use crate::repos::error::RepoResult;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct MemoryCredentials(HashMap<String, CredentialRow>);

    #[async_trait]
    impl CredentialStore for MemoryCredentials {
        async fn find_by_username(&self, username: &str) -> RepoResult<Option<CredentialRow>> {
            Ok(self.0.get(username).cloned())
        }
    }

    fn router(ada: Uuid) -> Router {
        let row = CredentialRow {
            user_id: ada,
            password_hash: bcrypt::hash("correct horse", 4).unwrap(),
        };
        let credentials = MemoryCredentials(HashMap::from([("ada".to_string(), row)]));

        let jwt = JwtIssuer::new("shared", None, None, 120);
        build_router(AppState::new(
            Arc::new(Authenticator::new(Arc::new(credentials))),
            Arc::new(TokenIssuer::new(jwt)),
        ))
    }

    async fn request_token(router: Router, body: String) -> (StatusCode, Value) {
        let req = Request::post("/api/v1/token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn issues_a_bearer_token_for_valid_credentials() {
        let ada = Uuid::new_v4();
        let body = json!({ "username": "ada", "password": "correct horse" }).to_string();

        let (status, json) = request_token(router(ada), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 120);
        assert_eq!(json["access_token"].as_str().unwrap().split('.').count(), 3);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let ada = Uuid::new_v4();

        let wrong = json!({ "username": "ada", "password": "battery staple" }).to_string();
        let (status, wrong) = request_token(router(ada), wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let unknown = json!({ "username": "bob", "password": "correct horse" }).to_string();
        let (status, unknown) = request_token(router(ada), unknown).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert_eq!(wrong, unknown);
        assert_eq!(wrong["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn malformed_body_is_a_structured_400() {
        let (status, json) = request_token(router(Uuid::new_v4()), r#"{"username":"ada"}"#.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }
}
