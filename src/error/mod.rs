mod app;
mod config;
mod http;
mod run;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use run::RunError;
pub use validation::ValidationError;
