use std::path::{Path, PathBuf};

use crate::models::Config;

const SAMPLE_CONFIG: &str = include_str!("../config.sample.toml");

const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_DATA_FILE: &str = "keywords.csv";

/// Load and merge one or more config files.
pub fn load_all(paths: &[PathBuf]) -> Config {
    match try_load_all(paths) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Load and merge config files in order. Later files override earlier ones.
pub fn try_load_all(paths: &[PathBuf]) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config: Option<Config> = None;

    for path in paths {
        log::info!("loading config: {}", path.display());
        let c = read_file(path)
            .map_err(|e| format!("error loading config {}: {}", path.display(), e))?;

        if let Some(ref mut existing) = config {
            merge(existing, c);
        } else {
            config = Some(c);
        }
    }

    let mut config = config.ok_or("no config files specified")?;
    apply_defaults(&mut config);
    Ok(config)
}

/// Generate sample config file.
pub fn generate_sample(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        return Err("config file already exists".into());
    }
    std::fs::write(path, SAMPLE_CONFIG)?;
    Ok(())
}

/// Load configuration from a given TOML file.
fn read_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&content)?;
    Ok(cfg)
}

/// Merge the given src config into the dest config struct.
fn merge(dest: &mut Config, src: Config) {
    if !src.app.address.is_empty() {
        dest.app.address = src.app.address;
    }
    if !src.app.data_file.is_empty() {
        dest.app.data_file = src.app.data_file;
    }
    if src.app.max_suggestions.is_some() {
        dest.app.max_suggestions = src.app.max_suggestions;
    }
    if src.app.enable_site.is_some() {
        dest.app.enable_site = src.app.enable_site;
    }
}

fn apply_defaults(cfg: &mut Config) {
    if cfg.app.address.is_empty() {
        cfg.app.address = DEFAULT_ADDRESS.to_string();
    }
    if cfg.app.data_file.is_empty() {
        cfg.app.data_file = DEFAULT_DATA_FILE.to_string();
    }
    if cfg.app.max_suggestions.is_none() {
        cfg.app.max_suggestions = Some(0);
    }
    if cfg.app.enable_site.is_none() {
        cfg.app.enable_site = Some(true);
    }
}
