use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of both `/auth/signup` and `/auth/login`.
///
/// Fields are optional so that a missing one is reported as a 400 with a
/// readable message instead of a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}
