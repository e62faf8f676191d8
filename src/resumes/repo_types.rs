use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    #[serde(deserialize_with = "text_or_number")]
    pub year: String,
}

/// Forms send graduation years as numbers as often as strings.
fn text_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(de)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub duration: String,
}

/// Owner-editable content of a resume, already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeFields {
    pub name: String,
    pub job_role: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
}

#[derive(Debug, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub job_role: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub education: Json<Vec<Education>>,
    pub experience: Json<Vec<Experience>>,
    pub skills: Vec<String>,
    pub ai_enhanced: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub job_role: String,
    pub email: String,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    pub ai_enhanced: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Resume {
    pub fn fields(&self) -> ResumeFields {
        ResumeFields {
            name: self.name.clone(),
            job_role: self.job_role.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            summary: self.summary.clone(),
            education: self.education.clone(),
            experience: self.experience.clone(),
            skills: self.skills.clone(),
        }
    }
}

impl From<ResumeRow> for Resume {
    fn from(r: ResumeRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            job_role: r.job_role,
            email: r.email,
            phone: r.phone,
            summary: r.summary,
            education: r.education.0,
            experience: r.experience.0,
            skills: r.skills,
            ai_enhanced: r.ai_enhanced,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
