use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use log::info;
use serde::Deserialize;

use crate::auth::{hash_password, validate_credentials, verify_login};
use crate::errors::{AppError, StoreError};
use crate::web::extract::MaybeUser;
use crate::web::notice::{Notice, NoticeQuery};
use crate::web::views;
use crate::web::AppState;

use super::redirect_with_cookie;

const INVALID_LOGIN: &str = "Invalid username or password.";

/// Fields of the login and registration forms
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn already_signed_in() -> Response {
    Redirect::to(&Notice::AlreadySignedIn.attach_to("/")).into_response()
}

/// GET /login
pub async fn login_form(MaybeUser(user): MaybeUser, Query(query): Query<NoticeQuery>) -> Response {
    if user.is_some() {
        return already_signed_in();
    }
    Html(views::login_page(query.notice(), None, "")).into_response()
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(already_signed_in());
    }

    let account = state.credentials.find_by_username(&form.username).await?;
    let stored_hash = account.as_ref().map(|account| account.password_hash.as_str());
    let verified = verify_login(&form.password, stored_hash, &state.login_decoy).await?;

    if !verified {
        info!("Failed login attempt for '{}'", form.username);
        return Ok(Html(views::login_page(None, Some(INVALID_LOGIN), &form.username)).into_response());
    }

    let cookie = state.sessions.set_identity(&headers, &form.username);
    Ok(redirect_with_cookie("/", cookie))
}

/// GET and POST /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie = state.sessions.clear_identity(&headers);
    redirect_with_cookie(&Notice::SignedOut.attach_to("/"), cookie)
}

/// GET /register
pub async fn register_form(MaybeUser(user): MaybeUser) -> Html<String> {
    Html(views::register_page(user.as_deref(), None, ""))
}

/// POST /register
pub async fn register_submit(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let rejected = |message: &str| {
        Html(views::register_page(user.as_deref(), Some(message), &form.username)).into_response()
    };

    if let Err(message) = validate_credentials(&form.username, &form.password) {
        return Ok(rejected(&message));
    }

    if state.credentials.find_by_username(&form.username).await?.is_some() {
        return Ok(rejected("That username is already taken."));
    }

    let hash = hash_password(&form.password, state.password_cost).await?;
    match state.credentials.create(&form.username, &hash).await {
        Ok(()) => Ok(Redirect::to(&Notice::Registered.attach_to("/login")).into_response()),
        Err(StoreError::UsernameTaken(_)) => Ok(rejected("That username is already taken.")),
        Err(e) => Err(e.into()),
    }
}
