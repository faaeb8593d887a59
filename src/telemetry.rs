use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Builds a subscriber that emits bunyan-formatted JSON to stdout. `RUST_LOG` takes
/// precedence over `env_filter`.
pub fn get_subscriber(name: String, env_filter: String) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, std::io::stdout);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Registers `subscriber` as the global default. Must be called only once.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) {
    // Redirect `log` records (e.g. sqlx statements) to tracing
    if let Err(err) = LogTracer::init() {
        eprintln!("Failed to set logger: {}", err);
    }

    if let Err(err) = set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {}", err);
    }
}
