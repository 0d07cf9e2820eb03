//! Public session endpoints: register, login, logout.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, SessionToken, ValidatedJson};
use crate::state::AppState;

/// The HttpOnly cookie carrying `token`.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.cookie_name().to_string(), token))
        .path("/")
        .http_only(true)
        .secure(state.config.session.cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

/// POST /api/v1/register
pub async fn register(
    State(state): State<AppState>,
    previous: SessionToken,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<ApiResponse<SessionResponse>>)> {
    let outcome = state
        .services
        .accounts
        .register(req.into(), previous.as_deref())
        .await?;

    let response = SessionResponse::from(outcome);
    let jar = jar.add(session_cookie(&state, response.token.clone()));
    Ok((StatusCode::CREATED, jar, Json(ApiResponse::ok(response))))
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<AppState>,
    previous: SessionToken,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    let outcome = state
        .services
        .accounts
        .login(&req.email, &req.password, previous.as_deref())
        .await?;

    let response = SessionResponse::from(outcome);
    let jar = jar.add(session_cookie(&state, response.token.clone()));
    Ok((jar, Json(ApiResponse::ok(response))))
}

/// POST /api/v1/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ApiResponse<MessageResponse>>)> {
    state
        .services
        .accounts
        .logout(auth.as_ref().map(AuthUser::principal))
        .await?;

    let jar = jar.remove(Cookie::build((state.cookie_name().to_string(), "")).path("/"));
    Ok((
        jar,
        Json(ApiResponse::ok(MessageResponse::new("logged out"))),
    ))
}
