//! User account and loyalty route handlers.
//!
//! Login, registration, profile self-service, admin account management and
//! the read-only loyalty surface (ledger history, redemptions).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use levelup_core::{Email, ReferralCode, Role, UserId};

use crate::{
    db::{
        LedgerRepository, RepositoryError, RewardRepository, UserRepository,
        users::{AdminNewUser, NewUser, ProfilePatch, UserPatch},
    },
    error::Result,
    models::{Address, LedgerEntry, Redemption, User},
    services::auth::{self, AuthError},
    state::AppState,
};

/// Rut stored for admin-created accounts that omit one.
const UNASSIGNED_RUT: &str = "NO ASIGNADO";

// =============================================================================
// Request Types
// =============================================================================

/// Login request. `loginIdentifier` is an email or an exact display name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub login_identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Self-service registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub age: u8,
    pub address: Option<Address>,
    /// Referral code of an existing account. Unknown or malformed codes
    /// are ignored; registration still succeeds without the bonus.
    pub referred_by: Option<String>,
}

/// Admin account-creation request. Role, rut, age and address are
/// optional; omitted ones take the panel's placeholder defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
    pub rut: Option<String>,
    pub age: Option<u8>,
    pub address: Option<Address>,
}

/// Admin account update. Absent or blank fields keep their current value;
/// `newPassword` only replaces the password when it passes the policy.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub rut: Option<String>,
    pub age: Option<u8>,
    pub address: Option<Address>,
    pub new_password: Option<String>,
}

/// Self-service profile update. Same merge rules as the admin update,
/// restricted to the fields the profile page edits.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub address: Option<Address>,
    pub new_password: Option<String>,
}

/// Point adjustment request. `pointsToAdd` is a signed delta; zero is a
/// no-op that succeeds.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRequest {
    #[serde(default)]
    pub points_to_add: i64,
}

/// Soft-delete toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub is_active: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Log a user in by email or display name.
///
/// The password is verified before the account status so a deactivated
/// account is only revealed to someone holding its credentials.
///
/// # Errors
///
/// Returns `401` for an unknown identifier or wrong password and `403`
/// for a deactivated account.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.db())
        .find_by_login_identifier(&body.login_identifier)
        .ok_or(AuthError::InvalidCredentials)?;
    auth::verify_password(&body.password, &user.password_hash)?;
    if !user.is_active {
        return Err(AuthError::AccountDeactivated.into());
    }

    Ok(Json(user))
}

/// Register a new customer account.
///
/// # Errors
///
/// Returns `400` for a weak password, a malformed email or an incomplete
/// address, and `409` when the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    auth::validate_password(&body.password)?;
    let password_hash = auth::hash_password(&body.password)?;
    let email = parse_email(&body.email)?;
    let address = body.address.ok_or_else(|| {
        RepositoryError::Validation("address requires street, city and region".to_owned())
    })?;
    let referred_by = body
        .referred_by
        .as_deref()
        .and_then(|code| ReferralCode::parse(code).ok());

    let user = UserRepository::new(state.db()).register(NewUser {
        name: body.name,
        email,
        password_hash,
        rut: body.rut,
        age: body.age,
        address,
        referred_by,
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List every account.
pub async fn list(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(UserRepository::new(state.db()).list_all())
}

/// Create an account from the admin panel.
///
/// # Errors
///
/// Returns `400` for a weak password or malformed email and `409` when
/// the email is already registered.
pub async fn create_by_admin(
    State(state): State<AppState>,
    Json(body): Json<AdminCreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    auth::validate_password(&body.password)?;
    let password_hash = auth::hash_password(&body.password)?;
    let email = parse_email(&body.email)?;

    let user = UserRepository::new(state.db()).create_by_admin(AdminNewUser {
        name: body.name,
        email,
        password_hash,
        role: body.role.unwrap_or(Role::Customer),
        rut: non_blank(body.rut).unwrap_or_else(|| UNASSIGNED_RUT.to_owned()),
        age: body.age.unwrap_or(0),
        address: body.address,
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Update an account from the admin panel.
///
/// # Errors
///
/// Returns `404` for an unknown account, `403` when changing the primary
/// admin's role, `409` when the new email is taken and `400` for a
/// malformed email.
pub async fn update_by_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AdminUpdateUserRequest>,
) -> Result<Json<User>> {
    let email = non_blank(body.email).map(|e| parse_email(&e)).transpose()?;
    let password_hash = hash_replacement_password(body.new_password.as_deref())?;

    let user = UserRepository::new(state.db()).update_by_admin(
        UserId::new(id),
        UserPatch {
            name: non_blank(body.name),
            email,
            rut: non_blank(body.rut),
            age: body.age,
            role: body.role,
            address: body.address,
            password_hash,
        },
    )?;

    Ok(Json(user))
}

/// Update a user's own profile.
///
/// # Errors
///
/// Returns `404` for an unknown account.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<User>> {
    let password_hash = hash_replacement_password(body.new_password.as_deref())?;

    let user = UserRepository::new(state.db()).update_profile(
        UserId::new(id),
        ProfilePatch {
            name: non_blank(body.name),
            age: body.age,
            address: body.address,
            password_hash,
        },
    )?;

    Ok(Json(user))
}

/// Adjust an account's point balance.
///
/// # Errors
///
/// Returns `404` for an unknown account and `400` when the delta would
/// take the balance below zero.
pub async fn adjust_points(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PointsRequest>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.db()).adjust_points(UserId::new(id), body.points_to_add)?;

    Ok(Json(user))
}

/// List an account's ledger entries, oldest first.
///
/// # Errors
///
/// Returns `404` for an unknown account.
pub async fn points_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LedgerEntry>>> {
    let history = LedgerRepository::new(state.db()).history_for_user(UserId::new(id))?;

    Ok(Json(history))
}

/// List an account's reward redemptions, oldest first.
///
/// # Errors
///
/// Returns `404` for an unknown account.
pub async fn redemptions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Redemption>>> {
    let redemptions = RewardRepository::new(state.db()).redemptions_for_user(UserId::new(id))?;

    Ok(Json(redemptions))
}

/// Activate or deactivate an account.
///
/// # Errors
///
/// Returns `404` for an unknown account and `403` when deactivating the
/// primary admin.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.db()).set_active(UserId::new(id), body.is_active)?;

    Ok(Json(user))
}

/// Delete an account permanently.
///
/// # Errors
///
/// Returns `404` for an unknown account and `403` for the primary admin.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    UserRepository::new(state.db()).delete(UserId::new(id))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_email(email: &str) -> std::result::Result<Email, RepositoryError> {
    Email::parse(email).map_err(|err| RepositoryError::Validation(err.to_string()))
}

/// Treat blank strings like absent fields; the panel forms send the whole
/// record back with untouched inputs left empty.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Hash a replacement password when one was provided and passes the
/// policy. Shorter input silently keeps the current password, which is
/// how the profile forms signal "leave it alone".
fn hash_replacement_password(new_password: Option<&str>) -> Result<Option<String>> {
    match new_password {
        Some(password) if auth::validate_password(password).is_ok() => {
            Ok(Some(auth::hash_password(password)?))
        }
        _ => Ok(None),
    }
}
