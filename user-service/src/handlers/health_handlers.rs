use axum::{extract::State, http::StatusCode};
use std::sync::Arc;
use users_shared::models::now_str;
use users_shared::store::UserStore;

use crate::response::ApiResponse;

const SERVICE_NAME: &str = "serverless-api";
const DEFAULT_REGION: &str = "us-east-1";

// GET /health
//
// Probes the store with a one-item scan that does not decode the item, so only
// reachability is checked. Never fails: an unreachable store is reported as a
// 503 body instead of an error.
pub async fn health_check<S>(State(store): State<Arc<S>>) -> ApiResponse
where
    S: UserStore,
{
    match store.ping().await {
        Ok(_) => {
            tracing::debug!("Health probe succeeded");
            let region = std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.into());
            ApiResponse::ok(serde_json::json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "timestamp": now_str(),
                "region": region,
                "dependencyStatus": "connected",
            }))
        }
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            ApiResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "service": SERVICE_NAME,
                    "timestamp": now_str(),
                    "dependencyStatus": "disconnected",
                    "error": err.to_string(),
                }),
            )
        }
    }
}
