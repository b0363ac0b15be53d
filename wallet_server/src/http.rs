//! HTTP/JSON API exposing wallet valuation.
//!
//! Routes:
//! - `GET /` - health check, empty 200.
//! - `GET /wallet/value?wallet=<id>` - the wallet's `Valuation`.
//!
//! Errors are returned as `{"error": "<message>"}`: 400 when the `wallet` parameter is
//! missing, 404 for an unknown wallet, 500 for any other failure.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use wallet_common::{Result, Valuation, WalletError};

use crate::valuation::WalletService;

/// Message returned when the `wallet` query parameter is absent.
pub const ERR_WALLET_REQUIRED: &str = "wallet is required";
/// Message returned for an unknown wallet id.
pub const ERR_WALLET_NOT_FOUND: &str = "wallet not found";
/// Message returned for every other failure.
pub const ERR_UNEXPECTED: &str = "unexpected error";

/// Build the router with all endpoints.
pub fn create_router(service: WalletService) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/wallet/value", get(wallet_value))
        .with_state(service)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, service: WalletService, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Query string of the valuation endpoint.
#[derive(Debug, Deserialize)]
pub struct WalletValueQuery {
    /// Wallet id.
    pub wallet: Option<String>,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

async fn wallet_value(
    State(service): State<WalletService>,
    Query(query): Query<WalletValueQuery>,
) -> std::result::Result<Json<Valuation>, ApiError> {
    let wallet_id = query
        .wallet
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::WalletRequired)?;

    // valuation never waits on the network; the store lookups are in-memory
    let valuation = service.wallet_value(&wallet_id).map_err(|e| {
        error!("error retrieving value of wallet {}: {}", wallet_id, e);
        ApiError::from(e)
    })?;
    Ok(Json(valuation))
}

/// Failure of an API call, mapped to a status code and an error body.
#[derive(Debug)]
pub enum ApiError {
    /// The `wallet` parameter is missing.
    WalletRequired,
    /// The wallet does not exist.
    WalletNotFound,
    /// Anything else.
    Unexpected,
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::WalletNotFound(_) => ApiError::WalletNotFound,
            _ => ApiError::Unexpected,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::WalletRequired => (StatusCode::BAD_REQUEST, ERR_WALLET_REQUIRED),
            ApiError::WalletNotFound => (StatusCode::NOT_FOUND, ERR_WALLET_NOT_FOUND),
            ApiError::Unexpected => (StatusCode::INTERNAL_SERVER_ERROR, ERR_UNEXPECTED),
        };
        (
            status,
            Json(ErrorBody {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
