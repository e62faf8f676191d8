use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{Resume, ResumeFields, ResumeRow};
use crate::db;

/// Resume persistence. Every call is scoped by `owner`; a resume that
/// belongs to someone else behaves exactly like a missing one.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn list(&self, owner: Uuid) -> anyhow::Result<Vec<Resume>>;
    async fn insert(&self, owner: Uuid, fields: &ResumeFields) -> anyhow::Result<Resume>;
    async fn find(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Resume>>;
    /// Overwrites the content and stamps `updated_at`.
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: &ResumeFields,
    ) -> anyhow::Result<Option<Resume>>;
    async fn set_ai_enhanced(
        &self,
        owner: Uuid,
        id: Uuid,
        text: &str,
    ) -> anyhow::Result<Option<Resume>>;
    /// `false` when nothing matched.
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
    async fn ping(&self) -> bool;
}

const COLUMNS: &str = "id, user_id, name, job_role, email, phone, summary, education, \
                       experience, skills, ai_enhanced, created_at, updated_at";

#[derive(Clone)]
pub struct PgResumeStore {
    db: PgPool,
}

impl PgResumeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn list(&self, owner: Uuid) -> anyhow::Result<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT {COLUMNS} FROM resumes WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn insert(&self, owner: Uuid, f: &ResumeFields) -> anyhow::Result<Resume> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            r#"
            INSERT INTO resumes
                (user_id, name, job_role, email, phone, summary, education, experience, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(owner)
        .bind(&f.name)
        .bind(&f.job_role)
        .bind(&f.email)
        .bind(&f.phone)
        .bind(&f.summary)
        .bind(Json(&f.education))
        .bind(Json(&f.experience))
        .bind(&f.skills)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT {COLUMNS} FROM resumes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        f: &ResumeFields,
    ) -> anyhow::Result<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            r#"
            UPDATE resumes
               SET name = $3, job_role = $4, email = $5, phone = $6, summary = $7,
                   education = $8, experience = $9, skills = $10, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(&f.name)
        .bind(&f.job_role)
        .bind(&f.email)
        .bind(&f.phone)
        .bind(&f.summary)
        .bind(Json(&f.education))
        .bind(Json(&f.experience))
        .bind(&f.skills)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn set_ai_enhanced(
        &self,
        owner: Uuid,
        id: Uuid,
        text: &str,
    ) -> anyhow::Result<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            r#"
            UPDATE resumes SET ai_enhanced = $3
             WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(text)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn ping(&self) -> bool {
        db::is_connected(&self.db).await
    }
}
