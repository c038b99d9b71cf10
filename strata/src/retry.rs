use shared::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Bounded retry for fallible tier operations.
///
/// Retries genuine faults only: any `Ok` result, including a valid
/// "not found", is returned immediately. Once attempts are exhausted the
/// last error surfaces to the caller.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Option<Duration>,
    deadline: Option<Instant>,
}

impl RetryPolicy {
    /// Fixed-count retry with no delay between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base: None,
            deadline: None,
        }
    }

    /// Fixed-count retry sleeping `base * 2^n` after the nth failed attempt
    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base: Some(base),
            deadline: None,
        }
    }

    /// Stop retrying once `deadline` has passed; checked between attempts
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Invoke `op` until it succeeds or the attempts run out
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || self.expired() {
                        return Err(err);
                    }
                    if let Some(base) = self.backoff_base {
                        let delay = base * 2u32.pow(attempt);
                        if let Some(deadline) = self.deadline {
                            if Instant::now() + delay >= deadline {
                                return Err(err);
                            }
                        }
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
