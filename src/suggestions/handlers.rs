use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extractors::AppJson,
    state::AppState,
    validation::non_blank,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestionRequest {
    pub role: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub skills: Vec<String>,
}

pub fn suggestion_routes() -> Router<AppState> {
    Router::new().route("/suggestions", post(suggest_skills))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id, email = %user.email))]
pub async fn suggest_skills(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<SuggestionRequest>,
) -> AppResult<Json<SuggestionResponse>> {
    let (Some(role), Some(context)) = (non_blank(body.role), non_blank(body.context)) else {
        return Err(AppError::BadRequest("Role and context are required".into()));
    };
    let skills = super::suggest(state.skills.as_ref(), &role, &context).await;
    Ok(Json(SuggestionResponse { skills }))
}
