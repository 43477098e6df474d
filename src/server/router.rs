//! HTTP surface of the observation agent.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{middleware, Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::{require_api_key, Validator};
use crate::error::Result;
use crate::protocol::{ErrorBody, ObservationSnapshot, ObserveRequest, OBSERVE_PATH};

use super::ObservationService;

/// Build the agent's router.
///
/// With a validator every route requires an accepted API key. Passing `None`
/// serves without authentication.
pub fn observation_router(
    service: ObservationService,
    validator: Option<Arc<dyn Validator>>,
) -> Router {
    let router = Router::new()
        .route(OBSERVE_PATH, post(observe))
        .with_state(service);

    let router = match validator {
        Some(validator) => {
            router.layer(middleware::from_fn_with_state(validator, require_api_key))
        }
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

async fn observe(
    State(service): State<ObservationService>,
    Json(request): Json<ObserveRequest>,
) -> std::result::Result<Json<ObservationSnapshot>, (StatusCode, Json<ErrorBody>)> {
    tokio::task::spawn_blocking(move || service.observe(&request.runtime_filter))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Observation task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::internal("observation failed")),
            )
        })
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
