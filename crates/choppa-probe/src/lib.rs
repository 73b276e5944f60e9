//! Single-shot reachability probes.

pub mod checker;
pub mod runner;

pub use checker::{ConnectivityChecker, SystemPingChecker};
pub use runner::{ping_args, run_ping, supervise, ProbeOutcome};
