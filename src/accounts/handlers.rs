use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    accounts::{
        dto::{
            AccountResponse, ErrorResponse, LoginRequest, MessageResponse, RegisterRequest,
            TokenResponse, UpdateAccountRequest,
        },
        errors::AccountError,
        jwt::JwtKeys,
        repo_types::{Account, AccountPatch, NewAccount},
    },
    state::AppState,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/users/:id", get(get_by_id).put(update))
        .route("/users/email/:email", get(get_by_email))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

/// Map the domain taxonomy onto transport responses. Unexpected failures get
/// a generic body; the cause stays in the logs.
fn map_error(err: AccountError) -> ApiError {
    match err {
        AccountError::InvalidArgument(message) => error_body(StatusCode::BAD_REQUEST, message),
        AccountError::DuplicateEmail => error_body(StatusCode::CONFLICT, "Email is already taken"),
        AccountError::NotFound => error_body(StatusCode::NOT_FOUND, "User not found"),
        AccountError::Persistence(cause) | AccountError::Internal(cause) => {
            error!(error = %cause, "request failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
        }
    }
}

/// Unknown email and bad password are deliberately indistinguishable.
fn invalid_credentials() -> ApiError {
    error_body(StatusCode::UNAUTHORIZED, "Invalid email or password")
}

fn projection(account: Account) -> AccountResponse {
    AccountResponse {
        email: account.email,
        full_name: account.full_name,
        role: account.role,
    }
}

fn validate_profile(email: &str, full_name: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) || email.len() > 150 {
        return Err(error_body(StatusCode::BAD_REQUEST, "Invalid email"));
    }
    if full_name.trim().is_empty() || full_name.len() > 100 {
        return Err(error_body(StatusCode::BAD_REQUEST, "Invalid full name"));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_profile(&payload.email, &payload.full_name)?;
    if payload.password.len() < 6 {
        warn!("password too short");
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters long",
        ));
    }

    let new_account = NewAccount {
        email: payload.email,
        full_name: payload.full_name,
        role: payload.role,
    };
    let account = state
        .accounts
        .create_account(new_account, &payload.password)
        .await
        .map_err(map_error)?;

    info!(account_id = account.id, email = %account.email, "user registered");
    Ok(Json(MessageResponse {
        message: "User registered successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ));
    }

    let account = match state.accounts.get_by_email(&payload.email).await {
        Ok(account) => account,
        Err(AccountError::NotFound) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(invalid_credentials());
        }
        Err(err) => return Err(map_error(err)),
    };

    let valid = state
        .accounts
        .validate_password(&account, &payload.password)
        .map_err(map_error)?;
    if !valid {
        warn!(email = %payload.email, account_id = account.id, "login invalid password");
        return Err(invalid_credentials());
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.issue(&account.email, account.role).map_err(map_error)?;

    info!(account_id = account.id, email = %account.email, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.get_by_id(id).await.map_err(map_error)?;
    Ok(Json(projection(account)))
}

#[instrument(skip(state))]
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.get_by_email(&email).await.map_err(map_error)?;
    Ok(Json(projection(account)))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Option<Json<UpdateAccountRequest>>,
) -> Result<StatusCode, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(error_body(StatusCode::BAD_REQUEST, "User cannot be null"));
    };
    validate_profile(&payload.email, &payload.full_name)?;
    let patch = AccountPatch {
        email: payload.email,
        full_name: payload.full_name,
        role: payload.role,
    };
    state.accounts.update_account(id, patch).await.map_err(map_error)?;
    Ok(StatusCode::NO_CONTENT)
}
