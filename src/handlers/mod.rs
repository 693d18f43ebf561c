pub mod site;
pub mod suggest;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tera::Tera;

use crate::autocomplete::Index;

/// Application context passed to all handlers.
pub struct Ctx {
    /// Fully loaded, read-only word index.
    pub index: Arc<Index>,

    /// Site templates (embedded in binary). None if the site is disabled.
    pub site_tpl: Option<Arc<Tera>>,

    pub consts: Consts,
    pub version: String,
}

/// Application constants.
#[derive(serde::Serialize)]
pub struct Consts {
    pub enable_site: bool,

    /// Upper bound on suggestions per query. 0 = unlimited.
    pub max_suggestions: usize,
}

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResp<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> IntoResponse for ApiResp<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub fn json<T: Serialize>(data: T) -> ApiResp<T> {
    ApiResp {
        data: Some(data),
        message: None,
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiErr {
    pub message: String,
    pub status: StatusCode,
}

impl ApiErr {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let json = Json(ApiResp::<()> {
            data: None,
            message: Some(self.message),
        });
        (self.status, json).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiErr>;

/// Resolve the number of suggestions to return from the requested limit and
/// the configured maximum. 0 means unlimited for both.
pub fn clamp_limit(requested: usize, max: usize) -> usize {
    if max == 0 {
        requested
    } else if requested == 0 || requested > max {
        max
    } else {
        requested
    }
}
