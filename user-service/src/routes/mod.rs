use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{
    health_handlers::health_check,
    user_handlers::{create_user, list_users, update_user},
};
use crate::response::ApiResponse;
use users_shared::store::{dynamo::DynamoUserStore, UserStore};

/// Creates a router backed by DynamoDB
///
/// The store, and with it the SDK client, is built once here and shared by every
/// invocation the process serves.
pub async fn create_router() -> Router {
    info!("Creating router with DynamoDB store");

    let dynamo_store = Arc::new(DynamoUserStore::new().await);

    // Check if we should remove the base path prefix
    let remove_base_path = std::env::var("REMOVE_BASE_PATH")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    // If REMOVE_BASE_PATH is set to true, don't add the /Prod prefix
    let prefix = if remove_base_path { "" } else { "/Prod" };
    info!("Using API route prefix: {}", prefix);

    create_router_with_store(dynamo_store, prefix)
}

/// Creates a router with a given store implementation
pub fn create_router_with_store<S>(store: Arc<S>, prefix: &str) -> Router
where
    S: UserStore + 'static,
{
    info!("Setting up API routes with prefix: '{}'", prefix);

    // Answers preflight requests; regular responses carry their own CORS header
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    // Path matched but method did not: axum answers with a bare 405
    async fn method_not_allowed_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> axum::response::Response {
        let response = next.run(req).await;
        if response.status() != StatusCode::METHOD_NOT_ALLOWED {
            return response;
        }

        warn!("Method not allowed");
        let allow = response.headers().get(header::ALLOW).cloned();
        let mut response = ApiResponse::new(
            StatusCode::METHOD_NOT_ALLOWED,
            serde_json::json!({ "error": "Method not allowed" }),
        )
        .into_response();
        if let Some(allow) = allow {
            response.headers_mut().insert(header::ALLOW, allow);
        }
        response
    }

    let api_routes = Router::new()
        .route("/users", get(list_users::<S>).post(create_user::<S>))
        .route("/users/", put(update_user::<S>).patch(update_user::<S>))
        .route(
            "/users/:userId",
            put(update_user::<S>).patch(update_user::<S>),
        )
        .route("/health", get(health_check::<S>))
        .with_state(store);

    let router = if prefix.is_empty() {
        // For tests or when no prefix is needed, don't nest the routes
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            ApiResponse::new(
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "Not found" }),
            )
        })
        .layer(middleware::from_fn(method_not_allowed_middleware))
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
