use crate::{
    error::Result,
    models::{ArtifactFailure, GenerationRequest, Prompt, RenderedImage, SizeOption},
    render::Renderer,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    pub count: u32,
    /// Sizes rendered for every image. Empty means `Original` only.
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    /// One size list per image; takes precedence over `sizes`.
    #[serde(default)]
    pub selections: Option<Vec<Vec<SizeOption>>>,
}

impl GenerateBody {
    pub fn to_request(&self) -> Result<GenerationRequest> {
        let request = GenerationRequest::new(Prompt::new(self.prompt.clone())?, self.count);
        request.validate()?;
        Ok(request)
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub device: String,
    pub model: String,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Serialize)]
pub struct ImageView {
    pub index: usize,
    pub caption: String,
    pub width: u32,
    pub height: u32,
    /// Base64 PNG at native size; absent if the raster could not be encoded.
    pub preview: Option<String>,
    pub artifacts: Vec<ArtifactView>,
    pub failures: Vec<ArtifactFailure>,
}

impl ImageView {
    pub fn from_rendered(rendered: RenderedImage, renderer: &Renderer) -> Self {
        let preview = match renderer.preview_png(&rendered.image) {
            Ok(bytes) => Some(STANDARD.encode(bytes)),
            Err(e) => {
                log::warn!("No preview for {}: {}", rendered.image.caption(), e);
                None
            }
        };

        Self {
            index: rendered.image.index,
            caption: rendered.image.caption(),
            width: rendered.image.width(),
            height: rendered.image.height(),
            preview,
            artifacts: rendered
                .artifacts
                .into_iter()
                .map(|artifact| ArtifactView {
                    label: artifact.download_label(),
                    mime: artifact.mime().to_string(),
                    size: artifact.size,
                    width: artifact.width,
                    height: artifact.height,
                    data: STANDARD.encode(&artifact.bytes),
                    filename: artifact.filename,
                })
                .collect(),
            failures: rendered.failures,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtifactView {
    pub filename: String,
    pub label: String,
    pub size: SizeOption,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct SizeView {
    pub label: &'static str,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<SizeOption> for SizeView {
    fn from(option: SizeOption) -> Self {
        let dimensions = option.dimensions();
        Self {
            label: option.label(),
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub device: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub detail: String,
}
