//! API errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hlk_core::SwitchError;
use hlk_device::DeviceError;
use hlk_notifier::NotifyError;
use thiserror::Error;
use tracing::{debug, error};

use crate::BaseResponse;

/// Errors returned by the request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not a valid switch request
    #[error("{0}")]
    InvalidBody(String),

    /// The switch value is neither "on" nor "off"
    #[error(transparent)]
    InvalidSwitch(#[from] SwitchError),

    /// The relay board could not be reached
    #[error(transparent)]
    Unreachable(DeviceError),

    /// The relay board rejected or failed a command
    #[error(transparent)]
    Device(DeviceError),

    /// Device failure after the command went through
    #[error(transparent)]
    Internal(DeviceError),

    /// Publishing the change notification failed
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// No stable status frame within the allowed attempts
    #[error("unexpected error")]
    Exhausted,
}

impl ApiError {
    /// Classify a device error raised while reading the relay status.
    ///
    /// Read failures here are protocol errors of the query itself.
    pub fn from_status_error(err: DeviceError) -> Self {
        if err.is_connect() {
            ApiError::Unreachable(err)
        } else if err.is_close() {
            ApiError::Internal(err)
        } else {
            ApiError::Device(err)
        }
    }

    /// Classify a device error raised while switching a relay.
    ///
    /// Once the command is accepted, a failure to read back the new state
    /// is a server-side error.
    pub fn from_switch_error(err: DeviceError) -> Self {
        if err.is_connect() {
            ApiError::Unreachable(err)
        } else if err.is_close() || err.is_read() {
            ApiError::Internal(err)
        } else {
            ApiError::Device(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidSwitch(_) | ApiError::Device(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) | ApiError::Notify(_) | ApiError::Exhausted => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "Request failed");
        } else {
            debug!(status = status.as_u16(), %message, "Request rejected");
        }

        (status, Json(BaseResponse { message })).into_response()
    }
}
