use std::path::PathBuf;

/// File loaded at startup when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "nba_players.csv";

/// Environment variable overriding the startup data file.
pub const DATA_ENV_VAR: &str = "AGE_CURVES_DATA";

/// Startup data file: `$AGE_CURVES_DATA` if set and non-empty, otherwise
/// `nba_players.csv` in the working directory.
pub fn data_path() -> PathBuf {
    resolve_data_path(std::env::var(DATA_ENV_VAR).ok())
}

fn resolve_data_path(from_env: Option<String>) -> PathBuf {
    match from_env {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
        _ => PathBuf::from(DEFAULT_DATA_FILE),
    }
}
