use std::sync::Once;

/// Logger settings.
///
/// `filter` uses the `env_logger` directive syntax, e.g.
/// `"tandem_engine::sim=trace,wgpu_core=warn"`. Precedence: `filter`, then
/// `RUST_LOG`, then [`DEFAULT_FILTER`] (or [`VERBOSE_FILTER`]).
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    /// Debug output for our crates when nothing else is configured.
    pub verbose: bool,
}

/// wgpu and naga are noisy below warn.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";
pub const VERBOSE_FILTER: &str = "info,tandem_engine=debug,tandem_studio=debug,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .format_timestamp_millis()
            .try_init();

        match installed {
            Ok(()) => log::debug!("log filter: {filter}"),
            Err(err) => eprintln!("logger already installed: {err}"),
        }
    });
}

fn resolve_filter(config: &LoggingConfig, env: Option<String>) -> String {
    let fallback = if config.verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    config
        .filter
        .clone()
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
