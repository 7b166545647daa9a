use crate::config::ConfigError;
use crate::marketplace::{
    ApplicationServiceError, ErrorKind, JobServiceError, ProfileServiceError, ValidationError,
};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Jobs(JobServiceError),
    Applications(ApplicationServiceError),
    Profiles(ProfileServiceError),
}

impl AppError {
    /// Classification for marketplace failures; startup failures have none.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Jobs(err) => Some(err.kind()),
            AppError::Applications(err) => Some(err.kind()),
            AppError::Profiles(err) => Some(err.kind()),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                None
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        if let AppError::Applications(ApplicationServiceError::Validation(
            ValidationError::DuplicateApplication { .. },
        )) = self
        {
            return StatusCode::CONFLICT;
        }

        match self.kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::ValidationFailure) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(ErrorKind::DependencyFailure) => StatusCode::BAD_GATEWAY,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Jobs(err) => write!(f, "{}", err),
            AppError::Applications(err) => write!(f, "{}", err),
            AppError::Profiles(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Jobs(err) => Some(err),
            AppError::Applications(err) => Some(err),
            AppError::Profiles(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = json!({ "error": self.to_string() });
        if let Some(kind) = self.kind() {
            body["kind"] = json!(kind);
        }
        if let AppError::Applications(ApplicationServiceError::ApplicationCreationFailed {
            employer,
            ..
        }) = &self
        {
            body["employer"] = json!(employer);
        }

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<JobServiceError> for AppError {
    fn from(value: JobServiceError) -> Self {
        Self::Jobs(value)
    }
}

impl From<ApplicationServiceError> for AppError {
    fn from(value: ApplicationServiceError) -> Self {
        Self::Applications(value)
    }
}

impl From<ProfileServiceError> for AppError {
    fn from(value: ProfileServiceError) -> Self {
        Self::Profiles(value)
    }
}
