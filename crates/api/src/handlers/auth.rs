//! Handlers for the `/auth` resource: registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use hytte_core::error::CoreError;
use hytte_core::slug::{slugify, with_suffix};
use hytte_db::models::user::{CreateUser, UserProfile};
use hytte_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "firstName must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName must be 1-100 characters"))]
    pub last_name: String,
    /// `user` (default) or `owner`. Admins are provisioned out of band.
    pub role: Option<String>,
    pub company_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus profile returned from both auth endpoints.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Register a new account. The email must be unique (the database
/// constraint surfaces as 409) and the password must meet the minimum
/// length.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthPayload>>)> {
    req.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_password_strength(&req.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let role = match req.role.as_deref() {
        None | Some("user") => "user",
        Some("owner") => "owner",
        Some(other) => {
            return Err(CoreError::Validation(format!("invalid role: {other}")).into());
        }
    };

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let slug = unique_user_slug(&state, &req.first_name, &req.last_name).await?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: req.email.trim().to_lowercase(),
            password_hash,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            role: role.to_string(),
            slug,
            company_slug: req.company_slug,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthPayload {
                token,
                user: UserProfile::from(&user),
            },
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Exchange credentials for a JWT. The same message is returned for an
/// unknown email and a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthPayload>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let verified = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(DataResponse {
        data: AuthPayload {
            token,
            user: UserProfile::from(&user),
        },
    }))
}

/// Profile slug derived from the name, suffixed until free. Names that
/// fold to nothing get no slug at all.
async fn unique_user_slug(
    state: &AppState,
    first_name: &str,
    last_name: &str,
) -> AppResult<Option<String>> {
    let base = slugify(&format!("{first_name} {last_name}"));
    if base.is_empty() {
        return Ok(None);
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while UserRepo::slug_exists(&state.pool, &candidate).await? {
        candidate = with_suffix(&base, n);
        n += 1;
    }
    Ok(Some(candidate))
}
