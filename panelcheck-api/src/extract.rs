/// Request extractors with JSON error rejections
///
/// Axum's stock `Json` and `Path` extractors reject with plain-text bodies.
/// These wrappers route the rejection through [`ApiError`] so malformed JSON
/// becomes a `bad_request` body and a non-integer id becomes `not_found`.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
