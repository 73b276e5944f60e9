use std::ops::ControlFlow;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Suspends the polling loop between checks.
pub trait Sleeper {
    /// `Break` means the loop should stop.
    fn sleep(&mut self, duration: Duration) -> ControlFlow<()>;

    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) -> ControlFlow<()> {
        (**self).sleep(duration)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Cloneable stop flag. Triggering it wakes any thread sleeping on it.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        *Self::lock(lock) = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *Self::lock(&self.inner.0)
    }

    /// Blocks up to `timeout`. Returns true if shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = Self::lock(lock);

        // Too far out to represent: wait for the trigger alone.
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            while !*stopped {
                stopped = cvar.wait(stopped).unwrap_or_else(PoisonError::into_inner);
            }
            return true;
        };

        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            stopped = cvar
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        *stopped
    }

    fn lock(lock: &Mutex<bool>) -> MutexGuard<'_, bool> {
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sleeper for Shutdown {
    fn sleep(&mut self, duration: Duration) -> ControlFlow<()> {
        if self.wait_timeout(duration) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn is_cancelled(&self) -> bool {
        self.is_triggered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_interval;
    use std::thread;

    #[test]
    fn untriggered_sleep_runs_full_duration() {
        let mut shutdown = Shutdown::new();
        let started = Instant::now();
        assert_eq!(
            shutdown.sleep(Duration::from_millis(50)),
            ControlFlow::Continue(())
        );
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn trigger_interrupts_sleep() {
        let mut shutdown = Shutdown::new();
        let remote = shutdown.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.trigger();
        });

        let started = Instant::now();
        assert_eq!(
            shutdown.sleep(Duration::from_secs(30)),
            ControlFlow::Break(())
        );
        assert!(started.elapsed() < Duration::from_secs(10));
        handle.join().unwrap();
    }

    #[test]
    fn largest_accepted_interval_still_sleeps() {
        let secs = parse_interval(Some("9223372036854775807")).unwrap();
        let mut shutdown = Shutdown::new();
        let remote = shutdown.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.trigger();
        });

        assert_eq!(
            shutdown.sleep(Duration::from_secs(secs)),
            ControlFlow::Break(())
        );
        handle.join().unwrap();
    }

    #[test]
    fn triggered_flag_is_shared() {
        let shutdown = Shutdown::new();
        let clone = shutdown.clone();
        assert!(!clone.is_cancelled());
        shutdown.trigger();
        assert!(clone.is_cancelled());
        assert!(clone.wait_timeout(Duration::from_secs(5)));
    }
}
