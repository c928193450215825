use rgen_canvas::{
    AppConfig, BedrockClient, GenerationRequest, Pipeline, Prompt, Renderer, SizeOption,
    DEFAULT_PROMPT,
};
use std::env;
use std::fs;
use std::path::PathBuf;

// cargo run --example generate -- "A lighthouse in a storm" 2
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    rgen_canvas::logger::init()?;

    let mut args = env::args().skip(1);
    let prompt = Prompt::new(args.next().unwrap_or_else(|| DEFAULT_PROMPT.to_string()))?;
    let count: u32 = args.next().map(|c| c.parse()).transpose()?.unwrap_or(1);
    let out_dir = PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()));

    let config = AppConfig::from_env()?;
    let provider = BedrockClient::new(config.bedrock, config.generator)
        .await
        .into_provider();
    let pipeline = Pipeline::new(provider, Renderer::new(), 1);

    let request = GenerationRequest::new(prompt, count);
    let results = pipeline.run(&request, &SizeOption::ALL).await?;

    fs::create_dir_all(&out_dir)?;
    for rendered in results {
        log::info!("🖼️  {} ({}x{})", rendered.image.caption(), rendered.image.width(), rendered.image.height());
        for artifact in rendered.artifacts {
            let path = out_dir.join(&artifact.filename);
            fs::write(&path, &artifact.bytes)?;
            log::info!("💾 Saved {}", path.display());
        }
        for failure in rendered.failures {
            log::error!("❌ {} skipped: {}", failure.size, failure.message);
        }
    }

    Ok(())
}
