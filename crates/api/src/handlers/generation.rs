//! Handlers for the generation pipeline.
//!
//! Routes:
//! - `POST /generate`       -- submit a job, returns `201 { statusId }`
//! - `POST /generate/sync`  -- run the pipeline inline, returns the result
//! - `GET  /status/{id}`    -- poll job status
//! - `GET  /styles`         -- accepted style labels
//! - `GET  /costumes`       -- built-in costume presets

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use costumier_core::costume::{self, Costume};
use costumier_core::encoding::MAX_IMAGES_PER_JOB;
use costumier_core::error::CoreError;
use costumier_core::style::PhotomakerStyle;
use costumier_core::types::JobId;
use costumier_db::models::generation_job::NewGenerationJob;
use costumier_db::models::queue::EnqueueJob;
use costumier_db::repositories::{GenerationJobRepo, QueueRepo};
use costumier_photomaker::GenerationResult;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Submission body for both generate routes.
///
/// Either `prompt` or `costume` must be present; a costume preset id
/// resolves to its catalog prompt.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    pub images: Vec<String>,
    #[validate(length(min = 1, max = 1000))]
    pub prompt: Option<String>,
    pub style: String,
    pub costume: Option<String>,
}

/// `201` response for the async route.
#[derive(Debug, Serialize)]
pub struct GenerateAccepted {
    #[serde(rename = "statusId")]
    pub status_id: JobId,
}

/// Poll response for `GET /status/{id}`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
    pub result: Option<serde_json::Value>,
}

/// `GET /styles` response.
#[derive(Debug, Serialize)]
pub struct StylesResponse {
    pub styles: Vec<&'static str>,
}

/// `GET /costumes` response.
#[derive(Debug, Serialize)]
pub struct CostumesResponse {
    pub costumes: &'static [Costume],
}

// ---------------------------------------------------------------------------
// Shared validation
// ---------------------------------------------------------------------------

/// Validate a submission and resolve the effective style and prompt.
///
/// Runs before any job row is created: an unknown style, an unknown
/// costume id, or a bad image count never reaches the status store.
fn validated_submission(input: &GenerateRequest) -> AppResult<(PhotomakerStyle, String)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let style = PhotomakerStyle::parse(&input.style).map_err(AppError::Core)?;

    if input.images.is_empty() {
        return Err(AppError::BadRequest(
            "at least one image is required".to_string(),
        ));
    }
    if input.images.len() > MAX_IMAGES_PER_JOB {
        return Err(AppError::BadRequest(format!(
            "at most {MAX_IMAGES_PER_JOB} images are accepted per request"
        )));
    }

    let prompt = match (&input.costume, &input.prompt) {
        (Some(id), _) => costume::find(id)
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!("unknown costume '{id}'")))
            })?
            .prompt
            .to_string(),
        (None, Some(prompt)) => prompt.clone(),
        (None, None) => {
            return Err(AppError::BadRequest(
                "either a prompt or a costume id is required".to_string(),
            ));
        }
    };

    Ok((style, prompt))
}

// ---------------------------------------------------------------------------
// Submit (async)
// ---------------------------------------------------------------------------

/// POST /api/v1/generate
///
/// Creates the job row (`started`) and a queue entry, then returns
/// immediately. A dispatcher claims the entry and drives the pipeline;
/// callers poll `GET /status/{id}`.
pub async fn create_generation(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<impl IntoResponse> {
    let (style, prompt) = validated_submission(&input)?;

    let job = GenerationJobRepo::create(
        &state.pool,
        &NewGenerationJob {
            prompt: prompt.clone(),
            style: style.as_str().to_string(),
            image_count: input.images.len() as i32,
            message: "Waiting for a worker...".to_string(),
        },
    )
    .await?;

    QueueRepo::enqueue(
        &state.pool,
        &EnqueueJob {
            job_id: job.id,
            images: input.images,
            prompt,
            style: style.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(job_id = %job.id, style = %style, "Generation job submitted");

    Ok((
        StatusCode::CREATED,
        Json(GenerateAccepted { status_id: job.id }),
    ))
}

// ---------------------------------------------------------------------------
// Submit (sync)
// ---------------------------------------------------------------------------

/// POST /api/v1/generate/sync
///
/// Runs the pipeline inline and returns the generated result. The job is
/// still tracked in the status store, so a client that loses the
/// connection can recover the outcome by polling.
pub async fn generate_sync(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<GenerationResult>> {
    let (style, prompt) = validated_submission(&input)?;

    let job = GenerationJobRepo::create(
        &state.pool,
        &NewGenerationJob {
            prompt: prompt.clone(),
            style: style.as_str().to_string(),
            image_count: input.images.len() as i32,
            message: "Processing started".to_string(),
        },
    )
    .await?;

    let result = state
        .processor
        .process(job.id, &input.images, &prompt, style)
        .await
        .map_err(AppError::Core)?;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Status poll
// ---------------------------------------------------------------------------

/// GET /api/v1/status/{id}
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<Json<StatusResponse>> {
    let job = GenerationJobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    let status = job.status().map(|s| s.name()).ok_or_else(|| {
        AppError::Internal(format!("job {id} carries unknown status id {}", job.status_id))
    })?;

    Ok(Json(StatusResponse {
        status,
        message: job.message,
        result: job.result,
    }))
}

// ---------------------------------------------------------------------------
// Catalog endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/styles
pub async fn list_styles() -> Json<StylesResponse> {
    Json(StylesResponse {
        styles: PhotomakerStyle::ALL.iter().map(|s| s.as_str()).collect(),
    })
}

/// GET /api/v1/costumes
pub async fn list_costumes() -> Json<CostumesResponse> {
    Json(CostumesResponse {
        costumes: costume::COSTUMES,
    })
}
