use crate::{error::Result, models::GeneratedImage, models::Prompt};
use async_trait::async_trait;

/// A pretrained text-to-image model, loaded once and shared read-only.
///
/// `generate` returns exactly one image per prompt, in prompt order. A batch
/// either succeeds as a whole or fails; no partial results are returned.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn generate(&self, prompts: &[Prompt]) -> Result<Vec<GeneratedImage>>;

    fn model_id(&self) -> &str;

    /// Where inference runs, for display.
    fn device(&self) -> &str;
}
