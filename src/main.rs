mod autocomplete;
mod cli;
mod config;
mod handlers;
mod http;
mod importer;
mod init;
mod models;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::Parser;

use autocomplete::{normalize_word, Index};
use cli::Commands;
use handlers::{Consts, Ctx};

#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    init::init_logger();

    let cli = cli::Cli::parse();

    // Handle CLI flags.
    if let Some(Commands::NewConfig { path }) = &cli.command {
        match config::generate_sample(path) {
            Ok(_) => {
                log::info!("config file generated: {}", path.display());
            }
            Err(e) => {
                log::error!("error generating config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Load config.
    let config = config::load_all(&cli.config);

    // Data file from --data flag, falling back to the config.
    let data_file = cli
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.app.data_file));

    // The vocabulary is required. Without it there is nothing to serve.
    let index = load_index(&data_file);

    // Print the tree and exit.
    if let Some(Commands::Dump { prefix }) = &cli.command {
        let mut out = std::io::stdout().lock();
        if let Err(e) = index.dump(&normalize_word(prefix), &mut out) {
            log::error!("error writing dump: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let enable_site = config.app.enable_site.unwrap_or(true);

    // Initialize site templates (embedded).
    let site_tpl = if enable_site {
        match init::init_site_templates() {
            Ok(t) => Some(Arc::new(t)),
            Err(e) => {
                log::error!("error loading site templates: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    // Setup the global app context used in HTTP handlers. The index is
    // read-only from here on.
    let ctx = Arc::new(Ctx {
        index: Arc::new(index),
        site_tpl,
        consts: Consts {
            enable_site,
            max_suggestions: config.app.max_suggestions.unwrap_or(0),
        },
        version: env!("VERSION").to_string(),
    });

    // Start the HTTP server.
    let routes = http::init_handlers(ctx);
    let addr = config.app.address;

    log::info!("starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("error listening on {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, routes).await {
        log::error!("server error: {}", e);
        std::process::exit(1);
    }
}

/// Load the index from the data file and exit with an error message on failure.
fn load_index(path: &Path) -> Index {
    match init::init_index(path) {
        Ok(idx) => idx,
        Err(e) => {
            log::error!("error loading words from '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
