//! Observability

use thiserror::Error;

mod logging;

pub use logging::init_logging;

/// Observability initialisation failure.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
