use crate::{
    error::{CanvasError, Result},
    logger::Timer,
    models::{ArtifactFailure, GeneratedImage, GenerationRequest, RenderedImage, SizeOption},
    provider::ModelProvider,
    render::Renderer,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Turns a prompt and a count into rendered images with their download artifacts.
///
/// The model is invoked once per run with `count` copies of the prompt. Generation
/// is all-or-nothing for the batch; encoding failures only drop the affected artifact.
/// Nothing is cached between runs.
pub struct Pipeline {
    provider: Arc<dyn ModelProvider>,
    renderer: Renderer,
    batch_permits: Semaphore,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn ModelProvider>, renderer: Renderer, max_concurrent_batches: usize) -> Self {
        Self {
            provider,
            renderer,
            batch_permits: Semaphore::new(max_concurrent_batches.max(1)),
        }
    }

    pub fn provider(&self) -> &Arc<dyn ModelProvider> {
        &self.provider
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Renders every image at each of `sizes`.
    pub async fn run(&self, request: &GenerationRequest, sizes: &[SizeOption]) -> Result<Vec<RenderedImage>> {
        let sizes = normalize_sizes(sizes);
        let images = self.generate(request).await?;
        Ok(images
            .into_iter()
            .map(|image| self.render_image(image, &sizes))
            .collect())
    }

    /// Renders image `i` at `selections[i]`.
    pub async fn run_per_image(
        &self,
        request: &GenerationRequest,
        selections: &[Vec<SizeOption>],
    ) -> Result<Vec<RenderedImage>> {
        request.validate()?;
        if selections.len() != request.count as usize {
            return Err(CanvasError::InvalidRequest(format!(
                "expected {} size selections, got {}",
                request.count,
                selections.len()
            )));
        }

        let images = self.generate(request).await?;
        Ok(images
            .into_iter()
            .zip(selections)
            .map(|(image, sizes)| self.render_image(image, &normalize_sizes(sizes)))
            .collect())
    }

    pub fn render_image(&self, image: GeneratedImage, sizes: &[SizeOption]) -> RenderedImage {
        let mut artifacts = Vec::with_capacity(sizes.len());
        let mut failures = Vec::new();

        for &size in sizes {
            match self.renderer.render(&image, size) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    log::warn!(
                        "Could not render {} at {}: {}",
                        image.caption(),
                        size.label(),
                        e
                    );
                    failures.push(ArtifactFailure {
                        image_index: image.index,
                        size,
                        message: e.to_string(),
                    });
                }
            }
        }

        RenderedImage {
            image,
            artifacts,
            failures,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        request.validate()?;

        let run_id = Uuid::new_v4();
        let prompts = request.batch();

        let _permit = self
            .batch_permits
            .acquire()
            .await
            .map_err(|e| CanvasError::ModelUnavailable(e.to_string()))?;

        log::info!(
            "[run:{}] Generating {} image(s) on {} with {}",
            run_id,
            prompts.len(),
            self.provider.device(),
            self.provider.model_id()
        );
        let timer = Timer::new(&format!("batch inference {}", run_id));

        let images = self.provider.generate(&prompts).await.map_err(|e| {
            log::error!("[run:{}] Batch failed: {}", run_id, e);
            e
        })?;
        timer.stop();

        if images.len() != prompts.len() {
            return Err(CanvasError::GenerationFailure(format!(
                "model returned {} images for {} prompts",
                images.len(),
                prompts.len()
            )));
        }

        Ok(images
            .into_iter()
            .enumerate()
            .map(|(index, image)| GeneratedImage { index, ..image })
            .collect())
    }
}

/// Drops repeated sizes, keeping first occurrence. An empty selection means `Original`.
fn normalize_sizes(sizes: &[SizeOption]) -> Vec<SizeOption> {
    let mut unique: Vec<SizeOption> = Vec::with_capacity(sizes.len());
    for &size in sizes {
        if !unique.contains(&size) {
            unique.push(size);
        }
    }
    if unique.is_empty() {
        unique.push(SizeOption::Original);
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prompt;
    use crate::render::decode_dimensions;
    use async_trait::async_trait;
    use image::DynamicImage;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Script {
        Solid(u32, u32),
        Fail,
        Unavailable,
        ShortBatch,
        EmptyFirst,
    }

    struct ScriptedProvider {
        script: Script,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
                delay: None,
            })
        }

        fn slow(script: Script, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
                delay: Some(delay),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        async fn generate(&self, prompts: &[Prompt]) -> Result<Vec<GeneratedImage>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let solid = |i: usize, w: u32, h: u32| {
                GeneratedImage::new(i, prompts[i].clone(), DynamicImage::new_rgb8(w, h))
            };
            match self.script {
                Script::Solid(w, h) => Ok((0..prompts.len()).map(|i| solid(i, w, h)).collect()),
                Script::Fail => Err(CanvasError::GenerationFailure("sampler diverged".into())),
                Script::Unavailable => Err(CanvasError::ModelUnavailable("weights missing".into())),
                Script::ShortBatch => Ok(vec![solid(0, 8, 8)]),
                Script::EmptyFirst => Ok((0..prompts.len())
                    .map(|i| if i == 0 { solid(i, 0, 0) } else { solid(i, 32, 32) })
                    .collect()),
            }
        }

        fn model_id(&self) -> &str {
            "scripted"
        }

        fn device(&self) -> &str {
            "CPU"
        }
    }

    fn request(count: u32) -> GenerationRequest {
        GenerationRequest::new(Prompt::new("Sunset on a beach").unwrap(), count)
    }

    fn pipeline(provider: Arc<ScriptedProvider>) -> Pipeline {
        Pipeline::new(provider, Renderer::new(), 1)
    }

    #[tokio::test]
    async fn test_returns_count_images_for_every_valid_count() {
        for count in 1..=5 {
            let provider = ScriptedProvider::new(Script::Solid(64, 64));
            let results = pipeline(provider.clone())
                .run(&request(count), &[SizeOption::Original])
                .await
                .unwrap();
            assert_eq!(results.len(), count as usize);
            assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_invalid_count_skips_inference() {
        for count in [0, 6] {
            let provider = ScriptedProvider::new(Script::Solid(64, 64));
            let err = pipeline(provider.clone())
                .run(&request(count), &[SizeOption::Original])
                .await
                .unwrap_err();
            assert!(matches!(err, CanvasError::InvalidRequest(_)));
            assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_sunset_scenario_filenames() {
        let provider = ScriptedProvider::new(Script::Solid(512, 512));
        let results = pipeline(provider)
            .run(&request(2), &[SizeOption::Original, SizeOption::Small])
            .await
            .unwrap();

        let filenames: Vec<&str> = results
            .iter()
            .flat_map(|r| r.artifacts.iter().map(|a| a.filename.as_str()))
            .collect();
        assert_eq!(
            filenames,
            vec![
                "generated_image_1_original.png",
                "generated_image_1_small_(256x256).png",
                "generated_image_2_original.png",
                "generated_image_2_small_(256x256).png",
            ]
        );
    }

    #[tokio::test]
    async fn test_artifact_dimensions_and_unique_names() {
        let provider = ScriptedProvider::new(Script::Solid(300, 200));
        let results = pipeline(provider)
            .run(&request(3), &SizeOption::ALL)
            .await
            .unwrap();

        let mut names = HashSet::new();
        for rendered in &results {
            for artifact in &rendered.artifacts {
                let expected = artifact
                    .size
                    .dimensions()
                    .unwrap_or(rendered.image.dimensions());
                assert_eq!(decode_dimensions(&artifact.bytes).unwrap(), expected);
                assert!(names.insert(artifact.filename.clone()));
            }
        }
        assert_eq!(names.len(), 3 * SizeOption::ALL.len());
    }

    #[tokio::test]
    async fn test_duplicate_and_empty_sizes() {
        let provider = ScriptedProvider::new(Script::Solid(32, 32));
        let pipeline = pipeline(provider);

        let results = pipeline
            .run(&request(1), &[SizeOption::Small, SizeOption::Small, SizeOption::Original])
            .await
            .unwrap();
        let sizes: Vec<_> = results[0].artifacts.iter().map(|a| a.size).collect();
        assert_eq!(sizes, vec![SizeOption::Small, SizeOption::Original]);

        let results = pipeline.run(&request(1), &[]).await.unwrap();
        assert_eq!(results[0].artifacts.len(), 1);
        assert_eq!(results[0].artifacts[0].size, SizeOption::Original);
    }

    #[tokio::test]
    async fn test_generation_failure_produces_nothing() {
        let provider = ScriptedProvider::new(Script::Fail);
        let err = pipeline(provider)
            .run(&request(2), &[SizeOption::Original, SizeOption::Small])
            .await
            .unwrap_err();
        assert!(matches!(err, CanvasError::GenerationFailure(_)));
    }

    #[tokio::test]
    async fn test_model_unavailable_propagates() {
        let provider = ScriptedProvider::new(Script::Unavailable);
        let err = pipeline(provider)
            .run(&request(1), &[SizeOption::Original])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "model_unavailable");
    }

    #[tokio::test]
    async fn test_short_batch_is_generation_failure() {
        let provider = ScriptedProvider::new(Script::ShortBatch);
        let err = pipeline(provider)
            .run(&request(3), &[SizeOption::Original])
            .await
            .unwrap_err();
        assert!(matches!(err, CanvasError::GenerationFailure(_)));
    }

    #[tokio::test]
    async fn test_encode_failure_spares_siblings() {
        let provider = ScriptedProvider::new(Script::EmptyFirst);
        let results = pipeline(provider)
            .run(&request(2), &[SizeOption::Original, SizeOption::Small])
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].artifacts.is_empty());
        assert_eq!(results[0].failures.len(), 2);
        assert!(results[0].failures.iter().all(|f| f.image_index == 0));
        assert_eq!(results[1].artifacts.len(), 2);
        assert!(results[1].failures.is_empty());
    }

    #[tokio::test]
    async fn test_run_per_image_selections() {
        let provider = ScriptedProvider::new(Script::Solid(40, 40));
        let pipeline = pipeline(provider.clone());

        let selections = vec![vec![SizeOption::Large], vec![SizeOption::Original, SizeOption::Medium]];
        let results = pipeline.run_per_image(&request(2), &selections).await.unwrap();
        assert_eq!(results[0].artifacts[0].filename, "generated_image_1_large_(1024x1024).png");
        assert_eq!(results[1].artifacts.len(), 2);

        let err = pipeline
            .run_per_image(&request(3), &selections)
            .await
            .unwrap_err();
        assert!(matches!(err, CanvasError::InvalidRequest(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_identical_prompts_run_inference_each_time() {
        let provider = ScriptedProvider::new(Script::Solid(16, 16));
        let pipeline = pipeline(provider.clone());
        pipeline.run(&request(1), &[]).await.unwrap();
        pipeline.run(&request(1), &[]).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_batches_are_queued() {
        let provider = ScriptedProvider::slow(Script::Solid(8, 8), Duration::from_millis(20));
        let pipeline = Arc::new(pipeline(provider.clone()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pipeline = pipeline.clone();
                tokio::spawn(async move { pipeline.run(&request(1), &[]).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        assert_eq!(provider.peak_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_normalize_sizes() {
        assert_eq!(normalize_sizes(&[]), vec![SizeOption::Original]);
        assert_eq!(
            normalize_sizes(&[SizeOption::Large, SizeOption::Small, SizeOption::Large]),
            vec![SizeOption::Large, SizeOption::Small]
        );
    }
}
