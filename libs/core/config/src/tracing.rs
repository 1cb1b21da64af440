use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter, Layer, Registry};

/// Additional layer stacked directly on the registry, ahead of the console output.
///
/// Used for sinks that apply their own level threshold (for example a search-index
/// shipper), so it is not subject to `RUST_LOG`.
pub type ExtraLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware console output and error span capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON, no targets.
/// - **Development** (default): pretty output.
///
/// `RUST_LOG` overrides the console filter. Safe to call multiple times; later calls
/// are no-ops (common in tests).
pub fn init_tracing(environment: &Environment) {
    init_tracing_with(environment, None);
}

/// Same as [`init_tracing`], with an optional extra layer that sees every event.
pub fn init_tracing_with(environment: &Environment, extra: Option<ExtraLayer>) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info,tower_http=info,sea_orm=warn")
        } else {
            EnvFilter::new("debug,hyper=info,h2=info,reqwest=info")
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(extra)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true)
                    .with_filter(filter),
            )
            .with(tracing_error::ErrorLayer::default())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(extra)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty()
                    .with_filter(filter),
            )
            .with(tracing_error::ErrorLayer::default())
            .try_init()
    };

    match result {
        Ok(_) => {
            info!(
                "Tracing initialized with ErrorLayer. Environment: {:?}",
                environment
            );
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}
