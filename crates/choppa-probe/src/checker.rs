use crate::runner::{run_ping, ProbeOutcome};
use choppa_model::ProbeSettings;
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that can answer "is the network up right now".
pub trait ConnectivityChecker {
    fn is_reachable(&self) -> bool;
}

impl<T: ConnectivityChecker + ?Sized> ConnectivityChecker for &T {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}

impl<T: ConnectivityChecker + ?Sized> ConnectivityChecker for Box<T> {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}

impl<T: ConnectivityChecker + ?Sized> ConnectivityChecker for Arc<T> {
    fn is_reachable(&self) -> bool {
        (**self).is_reachable()
    }
}

type CancelFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// Probes with the operating system's `ping` utility.
///
/// Every failure to run the utility (missing binary, spawn error, deadline)
/// reads as unreachable.
#[derive(Clone)]
pub struct SystemPingChecker {
    settings: ProbeSettings,
    cancelled: CancelFn,
}

impl std::fmt::Debug for SystemPingChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemPingChecker")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for SystemPingChecker {
    fn default() -> Self {
        Self::new(ProbeSettings::default())
    }
}

impl SystemPingChecker {
    pub fn new(settings: ProbeSettings) -> Self {
        Self {
            settings,
            cancelled: Arc::new(|| false),
        }
    }

    /// Stops an in-flight ping as soon as `cancelled` returns true.
    pub fn with_cancel(mut self, cancelled: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.cancelled = Arc::new(cancelled);
        self
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    pub fn probe(&self) -> ProbeOutcome {
        match run_ping(&self.settings, &*self.cancelled) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("probe failed, treating as unreachable: {err:#}");
                ProbeOutcome::NoReply(None)
            }
        }
    }
}

impl ConnectivityChecker for SystemPingChecker {
    fn is_reachable(&self) -> bool {
        let outcome = self.probe();
        debug!(host = %self.settings.target, ?outcome, "probe finished");
        outcome.is_reachable()
    }
}
