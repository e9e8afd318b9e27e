//! Logging setup utilities for the hiroba chat backend.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default directives.
///
/// The directives are only used when the `RUST_LOG` environment variable is
/// not set, so operators can always override them at launch.
///
/// # Arguments
///
/// * `default_directives` - Default filter directives
///   (e.g., "hiroba_server=debug,hiroba_shared=debug")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba_server=debug,hiroba_shared=debug");
/// ```
pub fn setup_logger(default_directives: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
