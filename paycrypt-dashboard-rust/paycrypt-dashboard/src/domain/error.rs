use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use paycrypt_admin_core::AdminError;
use std::fmt;

/// Error type of the dashboard handlers
#[derive(Debug, Clone)]
pub enum DashboardError {
    // Errors raised by the admin core
    Admin(AdminError),

    // Bad request parameters
    BadRequest(String),

    // Generic errors
    Generic(String),
}

impl DashboardError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        DashboardError::BadRequest(message.into())
    }

    fn error_type(&self) -> &'static str {
        match self {
            DashboardError::Admin(e) => match e {
                AdminError::Config(_) => "CONFIGURATION_ERROR",
                AdminError::Validation(_) => "VALIDATION_ERROR",
                AdminError::Storage(_) => "STORAGE_ERROR",
                AdminError::Network(_) => "NETWORK_ERROR",
                AdminError::Api { .. } => "BACKEND_ERROR",
                AdminError::Contract(_) => "CONTRACT_ERROR",
                AdminError::WalletRejected(_) => "WALLET_REJECTED",
                AdminError::Wallet(_) => "WALLET_ERROR",
                AdminError::Decode(_) => "DECODE_ERROR",
                AdminError::NotFound(_) => "NOT_FOUND",
                AdminError::Internal(_) => "INTERNAL_ERROR",
            },
            DashboardError::BadRequest(_) => "BAD_REQUEST",
            DashboardError::Generic(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Admin(e) => write!(f, "{e}"),
            DashboardError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            DashboardError::Generic(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for DashboardError {}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Admin(e) => match e {
                AdminError::Validation(_) => StatusCode::BAD_REQUEST,
                AdminError::NotFound(_) => StatusCode::NOT_FOUND,
                AdminError::Api { status: 401, .. } => StatusCode::UNAUTHORIZED,
                AdminError::Api { status: 403, .. } => StatusCode::FORBIDDEN,
                AdminError::Api { .. } | AdminError::Network(_) | AdminError::Contract(_) => {
                    StatusCode::BAD_GATEWAY
                }
                AdminError::WalletRejected(_) => StatusCode::CONFLICT,
                AdminError::Wallet(_) => StatusCode::SERVICE_UNAVAILABLE,
                AdminError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AdminError::Config(_) | AdminError::Storage(_) | AdminError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            DashboardError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Generic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{} ({})", self, status);
        } else {
            log::debug!("{} ({})", self, status);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.error_type(),
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

impl From<AdminError> for DashboardError {
    fn from(err: AdminError) -> Self {
        DashboardError::Admin(err)
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Generic(err.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
