pub mod bedrock;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod render;
#[cfg(feature = "server")]
pub mod server;

pub use bedrock::{BedrockClient, ImageClient};
pub use config::{AppConfig, BedrockConfig, GeneratorConfig};
pub use error::{CanvasError, Result};
pub use models::*;
pub use pipeline::Pipeline;
pub use provider::ModelProvider;
pub use render::Renderer;
