use std::sync::Arc;

use axum::{routing::get, Router};
use rust_embed::Embed;

use crate::handlers::{site, suggest, Ctx};

// Embedded site templates.
#[derive(Embed)]
#[folder = "site/"]
pub struct SiteTemplates;

/// Initialize HTTP routes.
pub fn init_handlers(ctx: Arc<Ctx>) -> Router {
    // Public API routes.
    let api_routes = Router::new()
        .route("/autocomplete", get(suggest::autocomplete))
        .route("/api/autocomplete", get(suggest::autocomplete_scored))
        .route("/api/stats", get(suggest::get_stats));

    let mut router = Router::new().merge(api_routes);

    if ctx.consts.enable_site && ctx.site_tpl.is_some() {
        let site_routes = Router::new()
            .route("/", get(site::index))
            .route("/search", get(site::search));

        router = router.merge(site_routes);
        log::info!("site routes enabled");
    } else {
        log::info!("site routes disabled (API-only mode)");
    }

    router.with_state(ctx)
}
