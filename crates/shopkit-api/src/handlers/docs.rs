//! Documentation bundle handlers.

use axum::extract::Path;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Redirect, Response};

use shopkit_core::error::AppError;

use crate::docs::{self, INDEX};
use crate::error::ApiResult;

/// GET /swagger
pub async fn redirect() -> Redirect {
    Redirect::permanent("/swagger/")
}

/// GET /swagger/
pub async fn index() -> ApiResult<Response> {
    serve(INDEX)
}

/// GET /swagger/{file}
pub async fn file(Path(file): Path<String>) -> ApiResult<Response> {
    serve(&file)
}

fn serve(path: &str) -> ApiResult<Response> {
    let asset = docs::asset(path)
        .ok_or_else(|| AppError::not_found(format!("no documentation file '{path}'")))?;
    Ok(([(CONTENT_TYPE, asset.content_type)], asset.body).into_response())
}
