use axum::http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Longest token lifetime accepted from the environment: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Upstream text-generation service used for enhancement and skill suggestions.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub text_base_url: String,
    pub alt_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
    /// Only origin allowed by CORS, also used to build the login link on `/`.
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let optional = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());

        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: optional("JWT_ISSUER", "resumekit"),
            audience: optional("JWT_AUDIENCE", "resumekit-users"),
            ttl_minutes: ttl_minutes(lookup("JWT_TTL_MINUTES"))?,
        };
        let ai = AiConfig {
            api_key: required("AI_API_KEY")?,
            text_base_url: optional("AI_TEXT_BASE_URL", "https://text.pollinations.ai"),
            alt_base_url: optional("AI_ALT_BASE_URL", "https://api.pollinations.ai"),
            timeout_secs: parse_num("AI_TIMEOUT_SECS", lookup("AI_TIMEOUT_SECS"), 30)?,
        };

        let frontend_url = required("FRONTEND_URL")?
            .trim_end_matches('/')
            .to_string();
        if HeaderValue::from_str(&frontend_url).is_err() {
            return Err(ConfigError::Invalid {
                var: "FRONTEND_URL",
                value: frontend_url,
            });
        }

        Ok(Self {
            database_url,
            jwt,
            ai,
            frontend_url,
            host: optional("APP_HOST", "0.0.0.0"),
            port: parse_num("APP_PORT", lookup("APP_PORT"), 8080)?,
        })
    }
}

fn parse_num<T: std::str::FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: v }),
    }
}

fn ttl_minutes(raw: Option<String>) -> Result<i64, ConfigError> {
    let ttl = parse_num("JWT_TTL_MINUTES", raw, 60 * 24)?;
    if !(1..=MAX_TTL_MINUTES).contains(&ttl) {
        return Err(ConfigError::Invalid {
            var: "JWT_TTL_MINUTES",
            value: ttl.to_string(),
        });
    }
    Ok(ttl)
}
