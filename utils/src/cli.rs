use clap::Args;

/// Flags shared by all three binaries: everything needed to locate a worker
/// count and turn logging on at a given verbosity.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Log level passed straight through to `tracing_subscriber::EnvFilter`
    /// (e.g. "info", "debug", "construct=trace,warn").
    #[arg(long, default_value_t = String::from("info"))]
    pub log_level: String,
}
