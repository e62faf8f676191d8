use tracing::{info, warn};

use super::{
    dto::{AuthResponse, CredentialsRequest, PublicUser},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::User,
};
use crate::{
    error::{AppError, AppResult, FieldError},
    validation::{is_valid_email, non_blank},
};

const DUPLICATE_EMAIL: &str = "Email already exists";

/// Email is trimmed and lowercased; the password is taken as-is.
fn credentials(req: CredentialsRequest) -> AppResult<(String, String)> {
    let email = non_blank(req.email).map(|e| e.to_lowercase());
    let password = req.password.filter(|p| !p.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::BadRequest(
            "Email and password are required".into(),
        )),
    }
}

fn session(keys: &JwtKeys, user: User) -> AppResult<AuthResponse> {
    let token = keys.issue(&user)?;
    Ok(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    })
}

pub async fn signup(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: CredentialsRequest,
) -> AppResult<AuthResponse> {
    let (email, password) = credentials(req)?;

    if !is_valid_email(&email) {
        return Err(AppError::Validation(vec![FieldError::new(
            "email",
            "Please provide a valid email address",
        )]));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
    }

    let hash = hash_password(&password)?;
    // A concurrent signup may have won the race since the lookup above.
    let user = users
        .create(&email, &hash)
        .await?
        .ok_or_else(|| AppError::BadRequest(DUPLICATE_EMAIL.into()))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    session(keys, user)
}

pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: CredentialsRequest,
) -> AppResult<AuthResponse> {
    let (email, password) = credentials(req)?;

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    session(keys, user)
}
