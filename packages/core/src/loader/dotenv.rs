//! Env file backend.
//!
//! The file is parsed with `dotenvy` without touching the process
//! environment. When inheritance is enabled the process environment is
//! layered on top, so variables already set in the process win over the file.

use crate::config::DotenvSettings;
use crate::store::SecretStore;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error, warn};

/// Load secrets according to the env file settings.
pub fn load(settings: &DotenvSettings) -> SecretStore {
    let inherited: Vec<(String, String)> = if settings.inherit_env {
        process_env()
    } else {
        Vec::new()
    };

    load_with_env(&settings.path, inherited)
}

/// Load the file at `path` and layer `env` over its entries.
///
/// A missing file is not an error: the result holds only `env`.
pub fn load_with_env<I>(path: &Path, env: I) -> SecretStore
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut secrets = read_file(path);
    secrets.extend(env);
    SecretStore::new(secrets)
}

fn read_file(path: &Path) -> HashMap<String, String> {
    let mut secrets = HashMap::new();

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            debug!(path = %path.display(), "Env file not found, continuing without it");
            return secrets;
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to open env file");
            return secrets;
        }
    };

    for entry in entries {
        match entry {
            Ok((key, value)) => {
                secrets.insert(key, value);
            }
            Err(dotenvy::Error::Io(e)) => {
                error!(path = %path.display(), error = %e, "Failed to read env file");
                break;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping malformed env file line");
            }
        }
    }

    secrets
}

/// Snapshot of the process environment, skipping non-UTF-8 entries.
fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}
