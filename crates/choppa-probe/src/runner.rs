use anyhow::{Context, Result};
use choppa_model::{Platform, ProbeSettings};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_EVERY: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Replied,
    NoReply(Option<i32>),
    TimedOut,
    Cancelled,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        matches!(self, ProbeOutcome::Replied)
    }
}

pub fn ping_args(settings: &ProbeSettings) -> Vec<String> {
    let mut args: Vec<String> = match settings.platform {
        // Windows takes the wait in milliseconds.
        Platform::Windows => vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            settings.timeout_ms.to_string(),
        ],
        Platform::MacOs => vec![
            "-c".to_string(),
            "1".to_string(),
            "-t".to_string(),
            settings.timeout_secs().to_string(),
        ],
        Platform::Unix => vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            settings.timeout_secs().to_string(),
        ],
    };
    args.push(settings.target.clone());
    args
}

/// Runs one echo request and waits for it to finish, hit its deadline, or be cancelled.
pub fn run_ping(settings: &ProbeSettings, cancelled: &dyn Fn() -> bool) -> Result<ProbeOutcome> {
    let args = ping_args(settings);
    debug!(program = %settings.program, ?args, "spawning probe");

    let child = Command::new(&settings.program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| {
            format!(
                "failed to spawn {} for {}",
                settings.program, settings.target
            )
        })?;

    supervise(child, settings.deadline(), cancelled)
}

/// Waits on a spawned probe, killing it once `deadline` elapses or `cancelled` fires.
pub fn supervise(
    mut child: Child,
    deadline: Duration,
    cancelled: &dyn Fn() -> bool,
) -> Result<ProbeOutcome> {
    let deadline = Instant::now().checked_add(deadline);

    loop {
        let status = child.try_wait().context("failed to wait on probe")?;

        if let Some(status) = status {
            debug!(%status, "probe exited");
            return Ok(if status.success() {
                ProbeOutcome::Replied
            } else {
                ProbeOutcome::NoReply(status.code())
            });
        }

        if cancelled() {
            reap(&mut child);
            return Ok(ProbeOutcome::Cancelled);
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            reap(&mut child);
            return Ok(ProbeOutcome::TimedOut);
        }

        thread::sleep(POLL_EVERY);
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
