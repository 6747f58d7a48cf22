use std::{
    future::Future,
    time::{Duration, Instant},
};

use rand::Rng;
use tokio::time::sleep;

use crate::error;

const DEADLINE: Duration = Duration::from_secs(10);
const BASE_DELAY_MS: u64 = 5;
const MAX_DELAY_MS: u64 = 250;

fn backoff(attempt: u32) -> Duration {
    let ceiling = BASE_DELAY_MS
        .saturating_mul(1 << attempt.min(16))
        .min(MAX_DELAY_MS);
    Duration::from_millis(rand::thread_rng().gen_range(1..=ceiling))
}

/// Re-runs `operation` while it fails with a 409 write conflict, until
/// `DEADLINE` has passed. Sleeps are jittered so competing callers spread out.
pub async fn retry_on_conflict<F, Fut, T>(operation: F) -> error::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = error::Result<T>>,
{
    retry_until(DEADLINE, operation).await
}

async fn retry_until<F, Fut, T>(deadline: Duration, mut operation: F) -> error::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = error::Result<T>>,
{
    let started = Instant::now();
    let mut attempt = 0;
    loop {
        match operation().await {
            Err(e) if e.code == 409 && started.elapsed() < deadline => {
                attempt += 1;
                log::debug!("Attempt {} failed: {}. Retrying...", attempt, e);
                sleep(backoff(attempt)).await;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::AddCode;

    #[actix_web::test]
    async fn retries_conflicts_only() {
        let calls = Cell::new(0);
        let result = retry_on_conflict(|| {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 12 {
                    Err(anyhow::anyhow!("conflict").code(409))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 12);

        calls.set(0);
        let result: error::Result<()> = retry_on_conflict(|| {
            calls.set(calls.get() + 1);
            async { Err(anyhow::anyhow!("missing").code(404)) }
        })
        .await;
        assert_eq!(result.unwrap_err().code, 404);
        assert_eq!(calls.get(), 1);
    }

    #[actix_web::test]
    async fn gives_up_after_deadline() {
        let calls = Cell::new(0);
        let result: error::Result<()> = retry_until(Duration::from_millis(50), || {
            calls.set(calls.get() + 1);
            async { Err(anyhow::anyhow!("conflict").code(409)) }
        })
        .await;
        assert_eq!(result.unwrap_err().code, 409);
        assert!(calls.get() > 1);
    }

    #[test]
    fn backoff_stays_within_bounds() {
        for attempt in 0..40 {
            let delay = backoff(attempt);
            assert!(delay >= Duration::from_millis(1));
            assert!(delay <= Duration::from_millis(MAX_DELAY_MS));
        }
    }
}
