pub mod image_client;

use crate::config::{BedrockConfig, GeneratorConfig};
use crate::provider::ModelProvider;
use aws_sdk_bedrockruntime::Client;
use std::sync::Arc;

pub use image_client::ImageClient;

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone)]
pub struct BedrockClient {
    image_client: ImageClient,
}

impl BedrockClient {
    /// Builds the runtime client once. Credentials and region fall back to the
    /// default AWS provider chain when not set explicitly.
    pub async fn new(bedrock_config: BedrockConfig, generator_config: GeneratorConfig) -> Self {
        let region = bedrock_config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "rgen-canvas",
                ))
                .region(aws_sdk_bedrockruntime::config::Region::new(region.clone()))
                .load()
                .await
        } else {
            aws_config::from_env()
                .region(aws_sdk_bedrockruntime::config::Region::new(region.clone()))
                .load()
                .await
        };

        log::info!(
            "Bedrock client ready (region: {}, model: {})",
            region,
            generator_config.model_id
        );

        Self {
            image_client: ImageClient::new(Client::new(&aws_config), generator_config, &region),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// Shared handle for the pipeline.
    pub fn into_provider(self) -> Arc<dyn ModelProvider> {
        Arc::new(self.image_client)
    }
}
