use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Why a listings query produced no result
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Mangler 'lat' eller 'lon' parameter.")]
    MissingCoordinates,

    #[error("Ugyldig koordinat '{0}'.")]
    InvalidCoordinate(String),

    #[error("Ugyldig 'radius' parameter. Må være mellom 100 og 1000.")]
    InvalidRadius,

    #[error("Ugyldig 'property_type' parameter '{0}'.")]
    InvalidPropertyType(String),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl QueryError {
    pub fn status(&self) -> StatusCode {
        match self {
            QueryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        if let QueryError::Internal(cause) = &self {
            error!("Error in listings query: {:#}", cause);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(QueryError::MissingCoordinates.status(), StatusCode::BAD_REQUEST);
        assert_eq!(QueryError::InvalidRadius.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            QueryError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_cause_is_not_shown() {
        let err = QueryError::Internal(anyhow::anyhow!("selector exploded"));
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
