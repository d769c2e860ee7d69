//! Catalogue API Server
//!
//! HTTP API for reading, writing and deleting geolocation entries.
//! Errors are returned as `{"detail": "..."}` bodies.

use crate::application::CatalogueService;
use crate::domain::entities::{CatalogueEntry, GeolocationRecord};
use crate::domain::errors::{CatalogueError, NormalizeError, ProviderError};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const DESCRIPTION: &str = "API which stores geolocation info of IP addresses and hostnames.";

const DATABASE_ERROR: &str = "Internal database error.";
const INTERNAL_ERROR: &str = "Internal server error.";

/// `?address=` query parameter shared by all address routes.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressQuery {
    pub address: String,
}

/// Service description response.
#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub description: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider_enabled: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// An error on its way out to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<CatalogueError> for ApiError {
    fn from(err: CatalogueError) -> Self {
        match &err {
            CatalogueError::Address(NormalizeError::Validation { .. }) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            CatalogueError::Address(NormalizeError::Unresolvable { .. })
            | CatalogueError::NotFound(_)
            | CatalogueError::Provider(ProviderError::NotFound) => {
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            CatalogueError::Provider(ProviderError::Transport(cause)) => {
                tracing::error!("provider unreachable: {}", cause);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
            CatalogueError::Provider(ProviderError::InternalConsistency(cause)) => {
                tracing::error!("provider returned data we cannot interpret: {}", cause);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            CatalogueError::Provider(ProviderError::UnknownProvider { .. }) => {
                tracing::error!("provider error: {}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            CatalogueError::Store(cause) => {
                tracing::error!("store error: {}", cause);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, DATABASE_ERROR)
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<CatalogueService>,
}

impl ApiState {
    pub fn new(service: Arc<CatalogueService>) -> Self {
        Self { service }
    }
}

/// Build the router with all routes attached.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/address",
            get(get_address_handler)
                .put(put_address_handler)
                .delete(delete_address_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API Server for the geolocation catalogue.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<CatalogueService>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(service),
        }
    }

    /// Run the API server until `shutdown` completes.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state.clone());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("catalogue API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn root_handler() -> impl IntoResponse {
    Json(DescriptionResponse {
        description: DESCRIPTION.to_string(),
    })
}

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider_enabled: state.service.provider_enabled(),
    })
}

async fn get_address_handler(
    State(state): State<ApiState>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> Result<Json<CatalogueEntry>, ApiError> {
    let Query(query) = query?;
    let entry = state.service.get_geolocation(&query.address).await?;
    Ok(Json(entry))
}

async fn put_address_handler(
    State(state): State<ApiState>,
    query: Result<Query<AddressQuery>, QueryRejection>,
    body: Result<Json<GeolocationRecord>, JsonRejection>,
) -> Result<Json<CatalogueEntry>, ApiError> {
    let Query(query) = query?;
    let Json(record) = body?;
    let entry = state.service.put_geolocation(&query.address, record).await?;
    Ok(Json(entry))
}

async fn delete_address_handler(
    State(state): State<ApiState>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(query) = query?;
    state.service.delete_geolocation(&query.address).await?;
    Ok(StatusCode::NO_CONTENT)
}
