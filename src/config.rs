use crate::error::{CanvasError, Result};
use std::env;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MODEL_ID: &str = "amazon.titan-image-generator-v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: Option<u16>,
    pub bedrock: BedrockConfig,
    pub generator: GeneratorConfig,
    pub max_concurrent_batches: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: None,
            bedrock: BedrockConfig::default(),
            generator: GeneratorConfig::default(),
            max_concurrent_batches: 1,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let port = parse_var("PORT")?;
        let max_concurrent_batches = parse_var("MAX_CONCURRENT_BATCHES")?.unwrap_or(1);

        let config = AppConfig {
            port,
            bedrock: BedrockConfig::from_env(),
            generator: GeneratorConfig::from_env()?,
            max_concurrent_batches,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_generator(mut self, config: GeneratorConfig) -> Self {
        self.generator = config;
        self
    }

    pub fn with_max_concurrent_batches(mut self, permits: usize) -> Self {
        self.max_concurrent_batches = permits;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_batches == 0 {
            return Err(CanvasError::ConfigError(
                "MAX_CONCURRENT_BATCHES must be at least 1".into(),
            ));
        }
        self.generator.validate()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();

        BedrockConfig {
            region,
            access_key,
            secret_key,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

/// Parameters sent to the model with every batch.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub cfg_scale: f32,
    pub quality: String,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            model_id: DEFAULT_MODEL_ID.to_string(),
            width: 512,
            height: 512,
            cfg_scale: 8.0,
            quality: "standard".to_string(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(GeneratorConfig {
            model_id: env::var("IMAGE_MODEL_ID").unwrap_or(defaults.model_id),
            width: parse_var("IMAGE_WIDTH")?.unwrap_or(defaults.width),
            height: parse_var("IMAGE_HEIGHT")?.unwrap_or(defaults.height),
            cfg_scale: parse_var("IMAGE_CFG_SCALE")?.unwrap_or(defaults.cfg_scale),
            quality: env::var("IMAGE_QUALITY").unwrap_or(defaults.quality),
            seed: parse_var("IMAGE_SEED")?,
        })
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_cfg_scale(mut self, cfg_scale: f32) -> Self {
        self.cfg_scale = cfg_scale;
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            return Err(CanvasError::ConfigError("IMAGE_MODEL_ID must not be empty".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::ConfigError(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !matches!(self.quality.as_str(), "standard" | "premium") {
            return Err(CanvasError::ConfigError(format!(
                "IMAGE_QUALITY must be 'standard' or 'premium', got '{}'",
                self.quality
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CanvasError::ConfigError(format!("{} has an invalid value: '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}
