use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Filter used until the config file has been read
pub const BOOTSTRAP_LOG_FILTER: &str = "studydesk=warn";

/// Handle to the installed log filter.
///
/// RUST_LOG, when set, wins over the config file and is never replaced.
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogFilter {
    /// Switch to the config file's filter unless RUST_LOG was given
    pub fn apply_config(&self, directives: &str) -> Result<(), reload::Error> {
        if self.from_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::new(directives))
    }

    /// The active filter directives, if the subscriber is still alive
    pub fn current(&self) -> Option<String> {
        self.handle.with_current(|filter| filter.to_string()).ok()
    }
}

/// Build a reloadable filter layer starting from `env`, or from the
/// bootstrap filter when there is none
pub fn reloadable_filter(
    env: Option<EnvFilter>,
) -> (reload::Layer<EnvFilter, Registry>, LogFilter) {
    let from_env = env.is_some();
    let initial = env.unwrap_or_else(|| EnvFilter::new(BOOTSTRAP_LOG_FILTER));
    let (layer, handle) = reload::Layer::new(initial);
    (layer, LogFilter { handle, from_env })
}

/// Install the global subscriber writing to stderr
pub fn init() -> LogFilter {
    let (filter_layer, filter) = reloadable_filter(EnvFilter::try_from_default_env().ok());
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    filter
}
