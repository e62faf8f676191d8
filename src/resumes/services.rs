use tracing::info;
use uuid::Uuid;

use super::{
    dto::{ResumeDraft, ResumePatch},
    repo::ResumeStore,
    repo_types::{Resume, ResumeFields},
};
use crate::{
    error::{AppError, AppResult, FieldError},
    validation::is_valid_email,
};

pub const SUMMARY_MAX_CHARS: usize = 500;

pub(crate) fn not_found() -> AppError {
    AppError::NotFound("Resume")
}

/// Collects every violated rule instead of stopping at the first one.
pub fn validate(fields: &ResumeFields) -> AppResult<()> {
    let mut errors = Vec::new();

    if fields.name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if fields.job_role.is_empty() {
        errors.push(FieldError::new("jobRole", "Job role is required"));
    }
    if fields.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&fields.email) {
        errors.push(FieldError::new(
            "email",
            "Please provide a valid email address",
        ));
    }
    if let Some(summary) = &fields.summary {
        if summary.chars().count() > SUMMARY_MAX_CHARS {
            errors.push(FieldError::new(
                "summary",
                format!("Summary cannot exceed {SUMMARY_MAX_CHARS} characters"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub async fn list(store: &dyn ResumeStore, owner: Uuid) -> AppResult<Vec<Resume>> {
    Ok(store.list(owner).await?)
}

pub async fn create(store: &dyn ResumeStore, owner: Uuid, draft: ResumeDraft) -> AppResult<Resume> {
    let fields = ResumeFields::from(draft);
    validate(&fields)?;
    let resume = store.insert(owner, &fields).await?;
    info!(user_id = %owner, resume_id = %resume.id, "resume created");
    Ok(resume)
}

pub async fn get(store: &dyn ResumeStore, owner: Uuid, id: Uuid) -> AppResult<Resume> {
    store.find(owner, id).await?.ok_or_else(not_found)
}

pub async fn update(
    store: &dyn ResumeStore,
    owner: Uuid,
    id: Uuid,
    patch: ResumePatch,
) -> AppResult<Resume> {
    let current = get(store, owner, id).await?;
    let fields = patch.apply(current.fields());
    validate(&fields)?;
    // Last write wins; a delete in between surfaces as not-found.
    let resume = store
        .update(owner, id, &fields)
        .await?
        .ok_or_else(not_found)?;
    info!(user_id = %owner, resume_id = %id, "resume updated");
    Ok(resume)
}

pub async fn delete(store: &dyn ResumeStore, owner: Uuid, id: Uuid) -> AppResult<()> {
    if !store.delete(owner, id).await? {
        return Err(not_found());
    }
    info!(user_id = %owner, resume_id = %id, "resume deleted");
    Ok(())
}
