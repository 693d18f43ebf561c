use std::path::Path;

use crate::{
    autocomplete::Index,
    http::SiteTemplates,
    importer::{self, ImportError},
};

/// Initialize logger.
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            use std::io::Write;
            let level = if record.level() != log::Level::Info {
                format!("[{}] ", record.level())
            } else {
                String::new()
            };
            writeln!(
                buf,
                "{} {}:{} {}{}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                level,
                record.args()
            )
        })
        .init();
}

/// Build the word index from the CSV data file. The returned index is
/// complete; it is not modified again once serving starts.
pub fn init_index(data_file: &Path) -> Result<Index, ImportError> {
    let mut index = Index::new();
    let stats = importer::load_csv(data_file, &mut index)?;

    if stats.skipped > 0 {
        log::warn!("skipped {} malformed records", stats.skipped);
    }
    log::info!(
        "loaded {} records: {} words, {} nodes",
        stats.loaded,
        index.len(),
        index.node_count()
    );

    if index.is_empty() {
        log::warn!("no words loaded from {}", data_file.display());
    }

    Ok(index)
}

/// Initialize site templates from embedded files.
pub fn init_site_templates() -> Result<tera::Tera, Box<dyn std::error::Error>> {
    let mut tera = tera::Tera::default();
    tera.autoescape_on(vec![".html"]);

    for file in SiteTemplates::iter() {
        let path: &str = file.as_ref();
        if path.ends_with(".html") {
            if let Some(content) = SiteTemplates::get(path) {
                let s = std::str::from_utf8(&content.data)?;
                tera.add_raw_template(path, s)?;
            }
        }
    }

    Ok(tera)
}
