use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
};

use super::{clamp_limit, json, ApiErr, ApiResp, Ctx, Result};
use crate::autocomplete::{normalize_word, Suggestion};
use crate::models::{ScoredResults, Stats, SuggestQuery, SuggestResults};

/// Suggest words for a prefix, most popular first.
pub async fn autocomplete(
    State(ctx): State<Arc<Ctx>>,
    Query(query): Query<SuggestQuery>,
) -> Result<ApiResp<SuggestResults>> {
    let res = do_suggest(&ctx, &query)?;

    Ok(json(SuggestResults {
        suggestions: res.into_iter().map(|s| s.word).collect(),
    }))
}

/// Same as `autocomplete`, but each suggestion carries its score.
pub async fn autocomplete_scored(
    State(ctx): State<Arc<Ctx>>,
    Query(query): Query<SuggestQuery>,
) -> Result<ApiResp<ScoredResults>> {
    let suggestions = do_suggest(&ctx, &query)?;
    Ok(json(ScoredResults { suggestions }))
}

/// Get index stats.
pub async fn get_stats(State(ctx): State<Arc<Ctx>>) -> ApiResp<Stats> {
    json(Stats {
        words: ctx.index.len(),
        nodes: ctx.index.node_count(),
    })
}

/// Normalize the query the same way words are normalized at load time and
/// look it up. An empty prefix is rejected here rather than matching everything.
fn do_suggest(ctx: &Ctx, query: &SuggestQuery) -> Result<Vec<Suggestion>> {
    let prefix = normalize_word(&query.prefix);
    if prefix.is_empty() {
        return Err(ApiErr::new("prefix is required", StatusCode::BAD_REQUEST));
    }

    let limit = clamp_limit(query.limit, ctx.consts.max_suggestions);
    Ok(ctx.index.search_prefix_limit(&prefix, limit))
}
