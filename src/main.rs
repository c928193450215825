use rgen_canvas::{logger, server, AppConfig, BedrockClient, Pipeline, Renderer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;
    if env_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = AppConfig::from_env()?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    if config.bedrock.access_key.is_none() {
        log::warn!("⚠️  No AWS credentials in environment variables, will try default credential chain");
    }

    let provider = BedrockClient::new(config.bedrock.clone(), config.generator.clone())
        .await
        .into_provider();
    let pipeline = Pipeline::new(provider, Renderer::new(), config.max_concurrent_batches);

    server::serve(pipeline, config.port()).await?;
    Ok(())
}
