use crate::{
    config::GeneratorConfig,
    error::{CanvasError, Result},
    models::{GeneratedImage, Prompt},
    provider::ModelProvider,
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use serde::Deserialize;
use serde_json::json;

/// Titan caps `numberOfImages` at five per invocation.
pub const MAX_IMAGES_PER_INVOCATION: u32 = 5;

const UNAVAILABLE_CODES: [&str; 4] = [
    "ResourceNotFoundException",
    "AccessDeniedException",
    "ModelNotReadyException",
    "UnrecognizedClientException",
];

#[derive(Deserialize)]
struct TitanImageResponse {
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    config: GeneratorConfig,
    device: String,
}

impl ImageClient {
    pub fn new(client: Client, config: GeneratorConfig, region: &str) -> Self {
        Self {
            client,
            config,
            device: format!("AWS Bedrock ({})", region),
        }
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (
                "amazon.titan-image-generator-v1",
                "Titan Image Generator G1",
                "Amazon",
            ),
            (
                "amazon.titan-image-generator-v2:0",
                "Titan Image Generator G1 v2",
                "Amazon",
            ),
        ]
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    async fn invoke(&self, prompt: &Prompt, count: u32) -> Result<Vec<DynamicImage>> {
        let request_json = build_payload(&self.config, prompt, count)?;

        log::info!(
            "Generating {} image(s) with model: {}",
            count,
            self.config.model_id
        );
        log::debug!("Image generation request payload: {}", request_json);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.config.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("AWS SDK Image Generation Error details: {:?}", e);
                match e.as_service_error() {
                    Some(service_error) => classify_service_error(
                        service_error.code(),
                        service_error.message().unwrap_or("no message"),
                    ),
                    None => CanvasError::GenerationFailure(format!("AWS SDK error: {}", e)),
                }
            })?;

        parse_response(&response.body.into_inner(), count as usize)
    }
}

#[async_trait]
impl ModelProvider for ImageClient {
    async fn generate(&self, prompts: &[Prompt]) -> Result<Vec<GeneratedImage>> {
        let mut images = Vec::with_capacity(prompts.len());
        for (prompt, count) in fold_runs(prompts) {
            for raster in self.invoke(prompt, count).await? {
                images.push(GeneratedImage::new(images.len(), prompt.clone(), raster));
            }
        }
        Ok(images)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn device(&self) -> &str {
        &self.device
    }
}

pub(crate) fn build_payload(config: &GeneratorConfig, prompt: &Prompt, count: u32) -> Result<String> {
    let mut generation_config = json!({
        "numberOfImages": count,
        "quality": config.quality,
        "cfgScale": config.cfg_scale,
        "width": config.width,
        "height": config.height
    });
    if let (Some(seed), Some(obj)) = (config.seed, generation_config.as_object_mut()) {
        obj.insert("seed".to_string(), json!(seed));
    }

    let payload = json!({
        "taskType": "TEXT_IMAGE",
        "textToImageParams": {
            "text": prompt.as_str()
        },
        "imageGenerationConfig": generation_config
    });

    serde_json::to_string(&payload).map_err(|e| CanvasError::SerializationError(e.to_string()))
}

pub(crate) fn parse_response(body: &[u8], expected: usize) -> Result<Vec<DynamicImage>> {
    let titan_response: TitanImageResponse = serde_json::from_slice(body)
        .map_err(|e| CanvasError::GenerationFailure(format!("malformed response: {}", e)))?;

    if let Some(error) = titan_response.error {
        return Err(CanvasError::GenerationFailure(error));
    }
    if titan_response.images.len() != expected {
        return Err(CanvasError::GenerationFailure(format!(
            "expected {} images, model returned {}",
            expected,
            titan_response.images.len()
        )));
    }

    titan_response
        .images
        .iter()
        .map(|encoded| {
            let bytes = STANDARD
                .decode(encoded)
                .map_err(|e| CanvasError::GenerationFailure(format!("invalid base64: {}", e)))?;
            image::load_from_memory(&bytes)
                .map_err(|e| CanvasError::GenerationFailure(format!("undecodable image: {}", e)))
        })
        .collect()
}

/// Folds consecutive identical prompts into `(prompt, n)` runs of at most
/// `MAX_IMAGES_PER_INVOCATION`, preserving order.
pub(crate) fn fold_runs(prompts: &[Prompt]) -> Vec<(&Prompt, u32)> {
    let mut runs: Vec<(&Prompt, u32)> = Vec::new();
    for prompt in prompts {
        match runs.last_mut() {
            Some((last, n)) if *last == prompt && *n < MAX_IMAGES_PER_INVOCATION => *n += 1,
            _ => runs.push((prompt, 1)),
        }
    }
    runs
}

fn classify_service_error(code: Option<&str>, message: &str) -> CanvasError {
    let code = code.unwrap_or("unknown");
    if UNAVAILABLE_CODES.contains(&code) {
        CanvasError::ModelUnavailable(format!("{} - {}", code, message))
    } else {
        CanvasError::GenerationFailure(format!("Bedrock service error: {} - {}", code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_payload_carries_batch_size_and_prompt() {
        let config = GeneratorConfig::default();
        let prompt = Prompt::new("Sunset on a beach").unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(&build_payload(&config, &prompt, 3).unwrap()).unwrap();

        assert_eq!(payload["taskType"], "TEXT_IMAGE");
        assert_eq!(payload["textToImageParams"]["text"], "Sunset on a beach");
        assert_eq!(payload["imageGenerationConfig"]["numberOfImages"], 3);
        assert_eq!(payload["imageGenerationConfig"]["width"], config.width);
        assert!(payload["imageGenerationConfig"].get("seed").is_none());
    }

    #[test]
    fn test_payload_includes_seed_when_set() {
        let config = GeneratorConfig::default().with_seed(42);
        let prompt = Prompt::new("a lighthouse").unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(&build_payload(&config, &prompt, 1).unwrap()).unwrap();
        assert_eq!(payload["imageGenerationConfig"]["seed"], 42);
    }

    #[test]
    fn test_parse_response_decodes_images() {
        let body = json!({ "images": [png_base64(8, 6), png_base64(8, 6)] }).to_string();
        let images = parse_response(body.as_bytes(), 2).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!((images[0].width(), images[0].height()), (8, 6));
    }

    #[test]
    fn test_parse_response_failures() {
        let with_error = json!({ "images": [], "error": "content filtered" }).to_string();
        assert!(matches!(
            parse_response(with_error.as_bytes(), 1),
            Err(CanvasError::GenerationFailure(msg)) if msg == "content filtered"
        ));

        let short = json!({ "images": [png_base64(2, 2)] }).to_string();
        assert!(matches!(
            parse_response(short.as_bytes(), 2),
            Err(CanvasError::GenerationFailure(_))
        ));

        let garbage = json!({ "images": ["not base64!!"] }).to_string();
        assert!(matches!(
            parse_response(garbage.as_bytes(), 1),
            Err(CanvasError::GenerationFailure(_))
        ));
    }

    #[test]
    fn test_fold_runs_batches_identical_prompts() {
        let a = Prompt::new("a").unwrap();
        let b = Prompt::new("b").unwrap();

        let same = vec![a.clone(); 5];
        assert_eq!(fold_runs(&same), vec![(&a, 5)]);

        let mixed = vec![a.clone(), a.clone(), b.clone(), a.clone()];
        assert_eq!(fold_runs(&mixed), vec![(&a, 2), (&b, 1), (&a, 1)]);

        let overflow = vec![a.clone(); 7];
        assert_eq!(fold_runs(&overflow), vec![(&a, 5), (&a, 2)]);
    }

    #[test]
    fn test_service_error_classification() {
        assert!(matches!(
            classify_service_error(Some("ResourceNotFoundException"), "no such model"),
            CanvasError::ModelUnavailable(_)
        ));
        assert!(matches!(
            classify_service_error(Some("ThrottlingException"), "slow down"),
            CanvasError::GenerationFailure(_)
        ));
        assert!(matches!(
            classify_service_error(None, "?"),
            CanvasError::GenerationFailure(_)
        ));
    }
}
