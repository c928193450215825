use super::types::ErrorBody;
use crate::error::CanvasError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

impl ResponseError for CanvasError {
    fn status_code(&self) -> StatusCode {
        match self {
            CanvasError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CanvasError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CanvasError::GenerationFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind().to_string(),
            message: self.user_message(),
            detail: self.to_string(),
        })
    }
}
