//! In-memory stand-ins for the stores and upstream services.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{repo::UserStore, repo_types::User},
    enhance::{Attempt, GatewayError},
    resumes::{
        repo::ResumeStore,
        repo_types::{Resume, ResumeFields},
    },
    suggestions::SkillSource,
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

#[derive(Default)]
pub struct MemoryResumeStore {
    resumes: Mutex<Vec<Resume>>,
}

impl MemoryResumeStore {
    fn with_owned<T>(&self, owner: Uuid, id: Uuid, f: impl FnOnce(&mut Resume) -> T) -> Option<T> {
        let mut resumes = self.resumes.lock().unwrap();
        resumes
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
            .map(f)
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn list(&self, owner: Uuid) -> anyhow::Result<Vec<Resume>> {
        let resumes = self.resumes.lock().unwrap();
        Ok(resumes.iter().filter(|r| r.user_id == owner).cloned().collect())
    }

    async fn insert(&self, owner: Uuid, f: &ResumeFields) -> anyhow::Result<Resume> {
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: owner,
            name: f.name.clone(),
            job_role: f.job_role.clone(),
            email: f.email.clone(),
            phone: f.phone.clone(),
            summary: f.summary.clone(),
            education: f.education.clone(),
            experience: f.experience.clone(),
            skills: f.skills.clone(),
            ai_enhanced: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.resumes.lock().unwrap().push(resume.clone());
        Ok(resume)
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Resume>> {
        Ok(self.with_owned(owner, id, |r| r.clone()))
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        f: &ResumeFields,
    ) -> anyhow::Result<Option<Resume>> {
        Ok(self.with_owned(owner, id, |r| {
            r.name = f.name.clone();
            r.job_role = f.job_role.clone();
            r.email = f.email.clone();
            r.phone = f.phone.clone();
            r.summary = f.summary.clone();
            r.education = f.education.clone();
            r.experience = f.experience.clone();
            r.skills = f.skills.clone();
            r.updated_at = Some(OffsetDateTime::now_utc());
            r.clone()
        }))
    }

    async fn set_ai_enhanced(
        &self,
        owner: Uuid,
        id: Uuid,
        text: &str,
    ) -> anyhow::Result<Option<Resume>> {
        Ok(self.with_owned(owner, id, |r| {
            r.ai_enhanced = Some(text.to_string());
            r.clone()
        }))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut resumes = self.resumes.lock().unwrap();
        let before = resumes.len();
        resumes.retain(|r| !(r.id == id && r.user_id == owner));
        Ok(resumes.len() < before)
    }

    async fn ping(&self) -> bool {
        true
    }
}

/// Attempt with a canned outcome that records how it was called.
pub struct ScriptedAttempt {
    name: &'static str,
    reply: Option<String>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAttempt {
    pub fn ok(name: &'static str, reply: &str) -> Self {
        Self {
            name,
            reply: Some(reply.to_string()),
            calls: Arc::default(),
            prompts: Arc::default(),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            reply: None,
            calls: Arc::default(),
            prompts: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl Attempt for ScriptedAttempt {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn call(&self, prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or_else(|| GatewayError::Url("scripted failure".into()))
    }
}

pub struct StaticSkills(Option<Vec<String>>);

impl StaticSkills {
    pub fn ok(skills: &[&str]) -> Self {
        Self(Some(skills.iter().map(|s| s.to_string()).collect()))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl SkillSource for StaticSkills {
    async fn fetch(&self, _role: &str, _context: &str) -> Result<Vec<String>, GatewayError> {
        self.0
            .clone()
            .ok_or_else(|| GatewayError::Url("upstream down".into()))
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn ai_config(base: &str, timeout_secs: u64) -> crate::config::AiConfig {
    crate::config::AiConfig {
        api_key: "test-key".into(),
        text_base_url: base.to_string(),
        alt_base_url: base.to_string(),
        timeout_secs,
    }
}
