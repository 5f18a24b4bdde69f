/*!
 * Request extractors for the login state.
 *
 * `CurrentUser` gates a route: an anonymous caller is redirected to the login
 * page instead of reaching the handler. `MaybeUser` never rejects.
 */

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use std::convert::Infallible;

use super::notice::Notice;
use super::AppState;

/// Username of an authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Username of the caller, if logged in
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<String>);

/// Where an anonymous caller of `parts` is sent
fn login_redirect(parts: &Parts) -> String {
    let forwarded = parts.uri.query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "notice")
            .and_then(|(_, value)| Notice::from_code(&value))
    });

    match forwarded {
        Some(notice) => notice.attach_to("/login"),
        None if parts.uri.path() == "/" => "/login".to_string(),
        None => Notice::SignInRequired.attach_to("/login"),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match state.sessions.get_identity(&parts.headers) {
            Some(username) => Ok(Self(username)),
            None => Err(Redirect::to(&login_redirect(parts))),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(state.sessions.get_identity(&parts.headers)))
    }
}
