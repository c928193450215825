use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Generation failed: {0}")]
    GenerationFailure(String),
    #[error("Encode failed: {0}")]
    EncodeFailure(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CanvasError {
    /// Stable machine-readable tag for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CanvasError::InvalidRequest(_) => "invalid_request",
            CanvasError::ModelUnavailable(_) => "model_unavailable",
            CanvasError::GenerationFailure(_) => "generation_failure",
            CanvasError::EncodeFailure(_) => "encode_failure",
            CanvasError::ConfigError(_) => "config_error",
            CanvasError::SerializationError(_) => "serialization_error",
        }
    }

    /// Message suitable for showing to the person who pressed "Generate".
    pub fn user_message(&self) -> String {
        match self {
            CanvasError::InvalidRequest(msg) => format!("Please check your input: {}", msg),
            CanvasError::ModelUnavailable(_) => {
                "The image model could not be loaded. Try again later.".to_string()
            }
            CanvasError::GenerationFailure(_) => {
                "Image generation failed. No images were produced.".to_string()
            }
            CanvasError::EncodeFailure(_) => {
                "This download could not be prepared in the selected size.".to_string()
            }
            CanvasError::ConfigError(_) | CanvasError::SerializationError(_) => {
                "Internal error while preparing the request.".to_string()
            }
        }
    }
}

impl From<image::ImageError> for CanvasError {
    fn from(err: image::ImageError) -> Self {
        CanvasError::EncodeFailure(err.to_string())
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CanvasError>;
