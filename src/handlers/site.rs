use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::Ctx;
use crate::autocomplete::normalize_word;

#[derive(serde::Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Build common template context.
fn base_context(ctx: &Ctx) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("consts", &ctx.consts);
    context.insert("version", &ctx.version);
    context
}

/// Render a site page from the embedded templates.
fn render(
    ctx: &Ctx,
    template: &str,
    context: &tera::Context,
) -> std::result::Result<Html<String>, impl IntoResponse> {
    match &ctx.site_tpl {
        Some(tpl) => tpl.render(template, context).map(Html).map_err(|e| {
            // Log full error chain for debugging.
            let mut msg = e.to_string();
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                msg.push_str(&format!(": {}", cause));
                source = std::error::Error::source(cause);
            }
            log::error!("template error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("template error: {}", msg),
            )
        }),
        None => Err((StatusCode::NOT_FOUND, "site is disabled".to_string())),
    }
}

/// Site index.
pub async fn index(State(ctx): State<Arc<Ctx>>) -> impl IntoResponse {
    let mut context = base_context(&ctx);
    context.insert("query", "");
    context.insert("suggestions", &Vec::<String>::new());
    render(&ctx, "index.html", &context)
}

/// Search page. With `?q=`, the suggestions are rendered server side so the
/// page works without JavaScript.
pub async fn search(
    State(ctx): State<Arc<Ctx>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = normalize_word(&params.q);

    let suggestions: Vec<String> = if query.is_empty() {
        Vec::new()
    } else {
        ctx.index
            .search_prefix_limit(&query, ctx.consts.max_suggestions)
            .into_iter()
            .map(|s| s.word)
            .collect()
    };

    let mut context = base_context(&ctx);
    context.insert("query", &query);
    context.insert("suggestions", &suggestions);
    render(&ctx, "index.html", &context)
}
