use tracing::subscriber::set_global_default;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Initialize the process-wide `tracing` subscriber for one of the three
/// binaries: an `EnvFilter` seeded from `log_level` (overridable via
/// `RUST_LOG`) feeding a plain `fmt` layer to stderr.
pub fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let subscriber = Registry::default().with(env_filter).with(fmt_layer);

    set_global_default(subscriber).expect("failed to set default tracing subscriber");
}
