//! Account and profile endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domain::envelope::ApiResponse;
use domain::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UserProfile, UserRole, UserStatsResponse, UserStatus,
};
use persistence::repositories::UserRepository;
use shared::password::{hash_password, verify_password};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let repo = UserRepository::new(state.pool.clone());

    if repo.email_in_use(&email, None).await? {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = repo.create(req.name.trim(), &email, &password_hash).await?;

    let role = UserRole::from(user.role);
    let token = state.jwt.generate_token(user.id, &user.email, role.as_str())?;

    tracing::info!(user_id = %user.id, "user registered");

    let response = AuthResponse {
        user: UserProfile::from(user),
        token,
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(response, "Account created")),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    req.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    match UserStatus::from(user.status) {
        UserStatus::Active => {}
        UserStatus::Suspended => {
            return Err(ApiError::Forbidden("Account is suspended".to_string()));
        }
        UserStatus::Deleted => return Err(invalid_credentials()),
    }

    let role = UserRole::from(user.role);
    let token = state.jwt.generate_token(user.id, &user.email, role.as_str())?;

    tracing::info!(user_id = %user.id, "user logged in");

    let response = AuthResponse {
        user: UserProfile::from(user),
        token,
    };
    Ok(Json(ApiResponse::new(response)))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::new(UserProfile::from(entity))))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    req.validate()?;

    if req.name.is_none() && req.email.is_none() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let repo = UserRepository::new(state.pool.clone());

    let email = req.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        if repo.email_in_use(email, Some(user.id)).await? {
            return Err(ApiError::Conflict("Email is already registered".to_string()));
        }
    }

    let name = req.name.as_ref().map(|n| n.trim().to_string());
    let entity = repo
        .update_profile(user.id, name.as_deref(), email.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::with_message(
        UserProfile::from(entity),
        "Profile updated",
    )))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    req.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !verify_password(&req.current_password, &entity.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    if verify_password(&req.new_password, &entity.password_hash)? {
        return Err(ApiError::Validation(
            "New password must be different from the current password".to_string(),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;
    repo.update_password(user.id, &password_hash).await?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "Password changed successfully",
    )))
}

/// GET /api/users/me/stats
pub async fn my_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<UserStatsResponse>>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let (reports_count, claims_count) = repo.activity_counts(user.id).await?;

    Ok(Json(ApiResponse::new(UserStatsResponse {
        reports_count,
        claims_count,
    })))
}
