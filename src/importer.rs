use std::{io, path::Path};

use crate::autocomplete::{normalize_word, Index};

/// Longest word, in characters, accepted from the data file.
const MAX_WORD_LEN: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Counts from a single load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub loaded: usize,
    pub skipped: usize,
}

/// Load a `word,frequency` CSV file into the index. The first row is a header
/// and is skipped. Malformed rows are logged and skipped.
pub fn load_csv(file_path: &Path, index: &mut Index) -> Result<ImportStats, ImportError> {
    log::info!("loading words from {} ...", file_path.display());

    let file = std::fs::File::open(file_path)?;
    load_reader(file, index)
}

/// Load `word,frequency` records from any reader. See `load_csv`.
pub fn load_reader<R: io::Read>(r: R, index: &mut Index) -> Result<ImportStats, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(r);

    let mut stats = ImportStats::default();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                log::warn!("line {}: skipping unreadable record: {}", line, e);
                stats.skipped += 1;
                continue;
            }
        };

        let line = record_line(&record);
        let res = read_record(&record)
            .and_then(|(word, freq)| index.insert(&word, freq).map_err(|e| e.to_string()));

        match res {
            Ok(()) => stats.loaded += 1,
            Err(msg) => {
                log::warn!("line {}: skipping record: {}", line, msg);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// 1-based line in the source where the record starts.
fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Parse one record into a normalized word and its frequency.
fn read_record(record: &csv::StringRecord) -> Result<(String, i64), String> {
    if record.len() < 2 {
        return Err(format!("{} column(s), expected 2", record.len()));
    }

    let word = normalize_word(record.get(0).unwrap_or(""));
    let num_chars = word.chars().count();
    if num_chars > MAX_WORD_LEN {
        return Err(format!(
            "word is {} characters long, max is {}",
            num_chars, MAX_WORD_LEN
        ));
    }

    let freq = record.get(1).unwrap_or("").trim();
    match freq.parse::<i64>() {
        Ok(f) => Ok((word, f)),
        Err(e) => Err(format!("error parsing frequency '{}': {}", freq, e)),
    }
}
