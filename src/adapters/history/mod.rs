//! File-backed conversation stores

use std::path::Path;

pub mod table;
pub mod transcript;

pub use table::TableStore;
pub use transcript::TranscriptStore;

/// Create the parent directory of `path` if it has one and it is missing
async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
