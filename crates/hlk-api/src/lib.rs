//! HLK-SW16 relay HTTP API
//!
//! Exposes the relay board over a small JSON API using axum:
//!
//! - `GET /health` - liveness check
//! - `GET /status` - state of every relay
//! - `POST /relay` - switch one relay on or off

mod error;

pub use error::ApiError;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use hlk_config::ServiceConfig;
use hlk_core::{validate_frame, RelayState, Relays, SwitchRequest};
use hlk_device::{with_connection, Command, DeviceConnector, DeviceError, TcpConnector};
use hlk_notifier::{HttpNotifier, Message, Notifier, NotifyError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    /// Opens a fresh connection to the board for every operation
    pub device: Arc<dyn DeviceConnector>,
    /// Relay change notifications, if a bus ingress is configured
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        device: Arc<dyn DeviceConnector>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            device,
            notifier,
        }
    }

    /// Build the state for a real board and, if configured, a real bus
    pub fn from_config(config: ServiceConfig) -> Result<Self, NotifyError> {
        let device: Arc<dyn DeviceConnector> = Arc::new(TcpConnector::new(
            config.device_addr(),
            config.connect_timeout,
            config.io_timeout,
        ));

        let notifier = match config.notifier_url() {
            Some(url) => {
                info!(%url, strict = config.notifier_strict, "Relay notifications enabled");
                Some(Arc::new(HttpNotifier::new(url)?) as Arc<dyn Notifier>)
            }
            None => None,
        };

        Ok(Self::new(config, device, notifier))
    }
}

/// Message-only response, used for health and errors
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse {
    pub message: String,
}

/// Response to a successful switch request
#[derive(Debug, Serialize, Deserialize)]
pub struct SwitchResponse {
    pub relays: Vec<RelayState>,
    /// Set when the relay switched but the notification could not be delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/status", get(get_status))
        .route("/relay", post(switch_relay))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves
pub async fn serve<F>(state: AppState, listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state);
    info!("API server listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

// ==================== Handlers ====================

/// GET /health - Health check endpoint
async fn health() -> Json<BaseResponse> {
    Json(BaseResponse {
        message: "OK".to_string(),
    })
}

/// GET /status - Returns the state of every relay
///
/// The board sometimes answers while it is still updating its outputs. Such
/// frames are dropped and the query repeated on a new connection, up to
/// `status_attempts` times.
async fn get_status(State(state): State<AppState>) -> Result<Json<Relays>, ApiError> {
    let attempts = state.config.status_attempts;

    for attempt in 1..=attempts {
        let frame = with_connection(state.device.as_ref(), |conn| {
            Box::pin(async move {
                conn.send(Command::Status).await?;
                conn.read_frame().await
            })
        })
        .await
        .map_err(ApiError::from_status_error)?;

        if validate_frame(&frame) {
            return Ok(Json(Relays::from_frame(&frame)));
        }

        warn!(attempt, attempts, ?frame, "Relay board returned an unstable frame");
        if attempt < attempts {
            tokio::time::sleep(state.config.status_retry_delay).await;
        }
    }

    Err(ApiError::Exhausted)
}

/// POST /relay - Switch one relay and return the new state of every relay
async fn switch_relay(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SwitchResponse>, ApiError> {
    // Parse JSON from body without strict Content-Type checking
    let request: SwitchRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let switch = request.validate()?;

    // An out-of-range relay only surfaces once the board is reachable.
    let command = Command::switch(request.id, switch);
    let notifier = state.notifier.clone();
    let message = Message::relay_changed(request.id, switch);

    let (frame, notified) = with_connection(state.device.as_ref(), move |conn| {
        Box::pin(async move {
            conn.send(command?).await?;

            let notified = match notifier {
                Some(notifier) => notifier.publish(&message).await,
                None => Ok(()),
            };

            let frame = conn.read_frame().await?;
            Ok::<_, DeviceError>((frame, notified))
        })
    })
    .await
    .map_err(ApiError::from_switch_error)?;

    info!(relay = request.id, %switch, "Relay switched");

    let warning = match notified {
        Ok(()) => None,
        Err(err) if state.config.notifier_strict => return Err(err.into()),
        Err(err) => {
            warn!(relay = request.id, error = %err, "Relay switched but notification failed");
            Some(err.to_string())
        }
    };

    Ok(Json(SwitchResponse {
        relays: Relays::from_frame(&frame).relays,
        warning,
    }))
}
