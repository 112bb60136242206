use std::time::Duration;

use thiserror::Error;

/// Failures a caller of the scan service has to tell apart.
///
/// An empty scan is not an error; it comes back as an empty `ScanResult`.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("a scan is already in progress")]
    AlreadyRunning,

    #[error("invalid network range: {0}")]
    InvalidRange(String),

    #[error("scan failed: {0}")]
    Failed(String),
}
