//! Diagnostic output. Each [Container](crate::container::Container) owns an optional
//! [DebugSink] receiving human-readable progress messages; without one, the container is silent
//! apart from errors reported through [tracing].

#[cfg(test)]
use mockall::automock;
use std::fmt::Arguments;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Receiver of debug messages. Messages can arrive concurrently from initialization of objects
/// within one batch, so implementations need to synchronize writes themselves.
#[cfg_attr(test, automock)]
pub trait DebugSink: Send + Sync {
    fn debug(&self, message: &str);
}

pub type DebugSinkPtr = Arc<dyn DebugSink>;

/// Forwards messages to [tracing] at debug level.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct TracingDebugSink;

impl DebugSink for TracingDebugSink {
    fn debug(&self, message: &str) {
        debug!("{message}");
    }
}

/// Formats messages lazily, only when a sink is present.
#[derive(Default, Clone)]
pub(crate) struct DebugLog {
    sink: Option<DebugSinkPtr>,
}

impl DebugLog {
    pub(crate) fn new(sink: Option<DebugSinkPtr>) -> Self {
        Self { sink }
    }

    #[inline]
    pub(crate) fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub(crate) fn debug(&self, args: Arguments<'_>) {
        if let Some(sink) = &self.sink {
            sink.debug(&args.to_string());
        }
    }
}

/// Installs a global `tracing-subscriber` formatter filtered by `RUST_LOG`. Returns `false` if a
/// global subscriber was already installed.
pub fn install_tracing_logger() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .is_ok()
}
