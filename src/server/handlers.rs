use super::{
    page::INDEX_HTML,
    types::{GenerateBody, GenerateResponse, HealthResponse, ImageView, SizeView},
    AppState,
};
use crate::{error::CanvasError, models::SizeOption};
use actix_web::{web, HttpResponse};

/// GET / - the generation page
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

/// GET /api/sizes - the fixed download size table
pub async fn sizes() -> HttpResponse {
    let sizes: Vec<SizeView> = SizeOption::ALL.into_iter().map(SizeView::from).collect();
    HttpResponse::Ok().json(sizes)
}

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let provider = state.pipeline.provider();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        model: provider.model_id().to_string(),
        device: provider.device().to_string(),
    })
}

/// POST /api/generate - generate `count` images and every requested download
///
/// Either the full image set is returned or a single error; never a partial batch.
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateBody>,
) -> Result<HttpResponse, CanvasError> {
    let body = body.into_inner();
    log::debug!(
        "Generate request received: prompt_len={}, count={}",
        body.prompt.len(),
        body.count
    );

    let request = body.to_request().map_err(|e| {
        log::warn!("Generate request rejected: {}", e);
        e
    })?;

    let pipeline = &state.pipeline;
    let rendered = match &body.selections {
        Some(selections) => pipeline.run_per_image(&request, selections).await?,
        None => pipeline.run(&request, &body.sizes).await?,
    };

    let images = rendered
        .into_iter()
        .map(|r| ImageView::from_rendered(r, pipeline.renderer()))
        .collect();

    Ok(HttpResponse::Ok().json(GenerateResponse {
        device: pipeline.provider().device().to_string(),
        model: pipeline.provider().model_id().to_string(),
        images,
    }))
}
