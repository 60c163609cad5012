use thiserror::Error;

use super::ConfigError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid run configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("A run is already active on this controller.")]
    AlreadyRunning,
    #[error("No run is active on this controller.")]
    NotRunning,
    #[error("Run supervisor exited before publishing a summary.")]
    SupervisorLost,
}
