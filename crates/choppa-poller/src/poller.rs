use crate::pick::Picker;
use crate::shutdown::Sleeper;
use choppa_model::FlavorText;
use choppa_probe::ConnectivityChecker;
use chrono::Local;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::{debug, info};

pub const BANNER_WIDTH: usize = 60;

const CONNECTED: &str = "✅ CONNECTED";
const DISCONNECTED: &str = "❌ DISCONNECTED";
const ALL_GOOD: &str = "WiFi is operational. All systems go!";
const RESTORED: &str = "Connection restored! You're back in action! 💪";

/// What a single `report_status` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub check: u64,
    pub connected: bool,
    pub restored: bool,
}

pub struct Poller<W, P> {
    out: W,
    picker: P,
    flavor: FlavorText,
    clock: fn() -> String,
    connection_lost: bool,
    check_count: u64,
}

fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl<W: Write, P: Picker> Poller<W, P> {
    pub fn new(out: W, picker: P, flavor: FlavorText) -> Self {
        Self {
            out,
            picker,
            flavor,
            clock: local_timestamp,
            connection_lost: false,
            check_count: 0,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    pub fn connection_lost(&self) -> bool {
        self.connection_lost
    }

    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn report_status(&mut self, connected: bool) -> io::Result<StatusReport> {
        let timestamp = (self.clock)();
        let restored = connected && self.connection_lost;
        let lost = !connected && !self.connection_lost;

        // Settle state before any output.
        self.check_count += 1;
        self.connection_lost = !connected;
        let check = self.check_count;

        if restored {
            info!(check, "connection restored");
        }
        if lost {
            info!(check, "connection lost");
        }

        let status = if connected { CONNECTED } else { DISCONNECTED };
        writeln!(self.out, "[{timestamp}] Check #{check}: {status}")?;

        if connected {
            writeln!(self.out, "   {ALL_GOOD}")?;
            if restored {
                writeln!(self.out, "   {RESTORED}")?;
            }
        } else {
            let quote = self.picker.pick(&self.flavor.quotes).map_or("", String::as_str);
            let route = self
                .picker
                .pick(&self.flavor.escape_routes)
                .map_or("", String::as_str);
            writeln!(self.out, "   ")?;
            writeln!(self.out, "   🚨 {quote}")?;
            writeln!(self.out, "   Escape Route: {route}")?;
        }

        writeln!(self.out)?;
        self.out.flush()?;

        Ok(StatusReport {
            check,
            connected,
            restored,
        })
    }

    pub fn print_banner(&mut self, interval_secs: u64) -> io::Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "GET TO THE CHOPPA - WiFi Monitor Starting...")?;
        writeln!(self.out, "{rule}")?;
        writeln!(
            self.out,
            "Monitoring WiFi connection every {interval_secs} seconds..."
        )?;
        writeln!(self.out, "Press Ctrl+C to stop.")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn print_farewell(&mut self) -> io::Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "Monitor stopped. Stay connected out there! 💻")?;
        writeln!(self.out, "{rule}")?;
        self.out.flush()
    }

    /// Probes, reports and sleeps until the sleeper signals cancellation.
    pub fn run<C, S>(&mut self, checker: &C, mut sleeper: S, interval: Duration) -> io::Result<()>
    where
        C: ConnectivityChecker + ?Sized,
        S: Sleeper,
    {
        self.print_banner(interval.as_secs())?;

        loop {
            let connected = checker.is_reachable();
            // A probe cut short by shutdown says nothing about the network.
            if sleeper.is_cancelled() {
                break;
            }

            let report = self.report_status(connected)?;
            debug!(?report, "check complete");

            if let ControlFlow::Break(()) = sleeper.sleep(interval) {
                break;
            }
        }

        self.print_farewell()
    }
}
