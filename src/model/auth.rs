use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponseDto {
    pub uid: String,
    pub role: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActivateDto {
    pub token: String,
}

/// Caller identity as returned by `/api/auth/me` and `/api/whoami`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IdentityDto {
    pub uid: String,
    pub email: Option<String>,
    pub role: Option<String>,
}
