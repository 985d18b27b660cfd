//! Readiness polling with an explicit deadline
//!
//! Used to wait for an external resource (typically a detached server
//! process) to become available. The deadline is computed once from a
//! monotonic clock; the probe is invoked immediately and then once per
//! interval until it reports readiness or the deadline passes.

use std::thread;
use std::time::{Duration, Instant};

use crate::types::{TestbedError, TestbedResult};

/// Bounded retry loop with a fixed probe interval and an overall timeout
#[derive(Debug, Clone)]
pub struct Waiter {
    interval: Duration,
    timeout: Duration,
}

impl Waiter {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Poll the probe until it returns true or the deadline passes
    ///
    /// `what` names the awaited resource in the timeout error message.
    pub fn wait_for(&self, what: &str, mut probe: impl FnMut() -> bool) -> TestbedResult<()> {
        let deadline = Instant::now() + self.timeout;

        loop {
            if probe() {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(TestbedError::Timeout(format!(
                    "{} did not become ready within {:.1}s",
                    what,
                    self.timeout.as_secs_f64()
                )));
            }

            // Never sleep past the deadline
            thread::sleep(self.interval.min(deadline - now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_resource_succeeds_on_first_probe() {
        let waiter = Waiter::new(Duration::from_millis(5), Duration::from_millis(50));
        let mut probes = 0;

        waiter
            .wait_for("resource", || {
                probes += 1;
                true
            })
            .expect("immediately-ready resource must succeed");

        assert_eq!(probes, 1);
    }

    #[test]
    fn resource_ready_after_n_ticks_takes_n_probes() {
        let waiter = Waiter::new(Duration::from_millis(2), Duration::from_millis(500));
        let mut probes = 0;

        waiter
            .wait_for("resource", || {
                probes += 1;
                probes == 4
            })
            .expect("resource becoming ready within bound must succeed");

        assert_eq!(probes, 4);
    }

    #[test]
    fn unavailable_resource_times_out_after_the_bound() {
        let timeout = Duration::from_millis(40);
        let waiter = Waiter::new(Duration::from_millis(5), timeout);

        let started = Instant::now();
        let err = waiter
            .wait_for("selenium server", || false)
            .expect_err("never-ready resource must time out");
        let elapsed = started.elapsed();

        assert!(matches!(err, TestbedError::Timeout(_)));
        assert!(err.to_string().contains("selenium server"));
        assert!(elapsed >= timeout, "must not fail before the bound");
    }
}
