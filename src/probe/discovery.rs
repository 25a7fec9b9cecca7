//! Service discovery from the monitored directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to list services in {directory}: {source}")]
pub struct DiscoveryError {
    pub directory: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Names consisting only of dots are directory pseudo-entries.
fn is_pseudo_entry(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '.')
}

/// List the service names under `directory`, sorted.
///
/// Re-read on every tick; services come and go externally.
pub async fn list_services(directory: &Path) -> Result<Vec<String>, DiscoveryError> {
    let wrap = |source| DiscoveryError {
        directory: directory.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(directory).await.map_err(wrap)?;
    let mut services = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(wrap)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_pseudo_entry(&name) {
            services.push(name);
        }
    }

    services.sort();
    Ok(services)
}
