use std::path::PathBuf;

/// Failure to read one component. Never fatal to a scan: the component is
/// logged and left out.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Plugin manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid plugin manifest at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
