use serde::{Deserialize, Deserializer, Serialize};

use super::repo_types::{Education, Experience, ResumeFields};
use crate::validation::non_blank;

/// Body of `POST /resumes`. Unknown keys (an owner id included) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDraft {
    pub name: Option<String>,
    pub job_role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
}

/// Body of `PUT /resumes/:id`.
///
/// Each field is `None` when the key is absent and `Some(None)` when it is
/// an explicit `null`. Absent keys keep their stored value; `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumePatch {
    #[serde(deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub job_role: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub summary: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub education: Option<Option<Vec<Education>>>,
    #[serde(deserialize_with = "present")]
    pub experience: Option<Option<Vec<Experience>>>,
    #[serde(deserialize_with = "present")]
    pub skills: Option<Option<Vec<String>>>,
}

/// Only called for keys that appear in the body, so a `null` lands as `Some(None)`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Body of `POST /resumes/enhance/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EnhanceRequest {
    pub resume: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn clean_education(items: Vec<Education>) -> Vec<Education> {
    items
        .into_iter()
        .map(|e| Education {
            institution: e.institution.trim().to_string(),
            degree: e.degree.trim().to_string(),
            year: e.year.trim().to_string(),
        })
        .collect()
}

fn clean_experience(items: Vec<Experience>) -> Vec<Experience> {
    items
        .into_iter()
        .map(|e| Experience {
            company: e.company.trim().to_string(),
            role: e.role.trim().to_string(),
            duration: e.duration.trim().to_string(),
        })
        .collect()
}

fn clean_skills(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter_map(|s| non_blank(Some(s))).collect()
}

impl From<ResumeDraft> for ResumeFields {
    fn from(d: ResumeDraft) -> Self {
        Self {
            name: trimmed(d.name),
            job_role: trimmed(d.job_role),
            email: trimmed(d.email),
            phone: non_blank(d.phone),
            summary: non_blank(d.summary),
            education: clean_education(d.education),
            experience: clean_experience(d.experience),
            skills: clean_skills(d.skills),
        }
    }
}

impl ResumePatch {
    /// Applies the present keys on top of `current`. A cleared required
    /// field comes out empty and is caught by validation.
    pub fn apply(self, mut current: ResumeFields) -> ResumeFields {
        if let Some(name) = self.name {
            current.name = trimmed(name);
        }
        if let Some(job_role) = self.job_role {
            current.job_role = trimmed(job_role);
        }
        if let Some(email) = self.email {
            current.email = trimmed(email);
        }
        if let Some(phone) = self.phone {
            current.phone = non_blank(phone);
        }
        if let Some(summary) = self.summary {
            current.summary = non_blank(summary);
        }
        if let Some(education) = self.education {
            current.education = clean_education(education.unwrap_or_default());
        }
        if let Some(experience) = self.experience {
            current.experience = clean_experience(experience.unwrap_or_default());
        }
        if let Some(skills) = self.skills {
            current.skills = clean_skills(skills.unwrap_or_default());
        }
        current
    }
}
