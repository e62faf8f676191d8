use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{EnhanceRequest, MessageResponse, ResumeDraft, ResumePatch},
    repo_types::Resume,
    services,
};
use crate::{
    auth::AuthUser,
    enhance,
    error::AppResult,
    extractors::{AppJson, OptionalJson},
    state::AppState,
};

pub fn resume_routes() -> Router<AppState> {
    Router::new()
        .route("/resumes", get(list_resumes).post(create_resume))
        .route(
            "/resumes/:id",
            get(get_resume).put(update_resume).delete(delete_resume),
        )
        .route("/resumes/enhance/:id", post(enhance_resume))
}

/// Ids that do not parse cannot name any resume.
fn resume_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| services::not_found())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Resume>>> {
    Ok(Json(services::list(state.resumes.as_ref(), user.id).await?))
}

#[instrument(skip(state, user, draft), fields(user_id = %user.id))]
pub async fn create_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(draft): AppJson<ResumeDraft>,
) -> AppResult<(StatusCode, Json<Resume>)> {
    let resume = services::create(state.resumes.as_ref(), user.id, draft).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Resume>> {
    let id = resume_id(&id)?;
    Ok(Json(services::get(state.resumes.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, user, patch), fields(user_id = %user.id))]
pub async fn update_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ResumePatch>,
) -> AppResult<Json<Resume>> {
    let id = resume_id(&id)?;
    Ok(Json(
        services::update(state.resumes.as_ref(), user.id, id, patch).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = resume_id(&id)?;
    services::delete(state.resumes.as_ref(), user.id, id).await?;
    Ok(Json(MessageResponse {
        message: "Resume deleted successfully",
    }))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn enhance_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    OptionalJson(body): OptionalJson<EnhanceRequest>,
) -> AppResult<Json<Resume>> {
    let id = resume_id(&id)?;
    let resume = enhance::enhance_resume(
        state.resumes.as_ref(),
        &state.enhancer,
        user.id,
        id,
        body.resume,
    )
    .await?;
    Ok(Json(resume))
}
