//! `tracing` integration for the search-index sink.

use tracing::{Event, Subscriber};
use tracing_subscriber::filter::{Filtered, Targets};
use tracing_subscriber::layer::{Context, Layer};

use crate::entry::LogEntry;
use crate::severity::Severity;
use crate::shipper::LogShipper;

/// Targets never forwarded: the sink's own diagnostics and its HTTP stack.
const EXCLUDED_TARGETS: &[&str] = &[
    "observability",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

/// Converts events into [`LogEntry`] documents and hands them to a [`LogShipper`].
pub struct SearchIndexLayer {
    shipper: LogShipper,
    host: String,
    min_severity: Severity,
}

impl SearchIndexLayer {
    pub fn new(shipper: LogShipper, host: impl Into<String>, min_severity: Severity) -> Self {
        Self {
            shipper,
            host: host.into(),
            min_severity,
        }
    }

    /// Level filter matching this layer's threshold.
    ///
    /// `Targets` matches directives on plain string prefixes, so excluded
    /// targets are checked per event instead.
    pub fn filter(&self) -> Targets {
        Targets::new().with_default(self.min_severity.as_level())
    }

    /// The layer wrapped in its own per-layer filter, ready to add to a registry.
    pub fn filtered<S>(self) -> Filtered<Self, Targets, S>
    where
        S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let filter = self.filter();
        self.with_filter(filter)
    }
}

impl<S: Subscriber> Layer<S> for SearchIndexLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if is_excluded(event.metadata().target()) {
            return;
        }

        let entry = LogEntry::from_event(event, &self.host);
        if entry.level.is_enabled(self.min_severity) {
            self.shipper.try_ship(entry);
        }
    }
}

/// `target` is an excluded crate or one of its modules.
fn is_excluded(target: &str) -> bool {
    EXCLUDED_TARGETS.iter().any(|excluded| {
        target
            .strip_prefix(excluded)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Panic hook that logs the panic with `severity = "panic"`, then runs the previous hook.
pub fn install_panic_logging() {
    let previous = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string());
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()));

        tracing::error!(
            target: "panic",
            severity = "panic",
            location = location.as_deref(),
            "{}",
            message
        );

        previous(info);
    }));
}
