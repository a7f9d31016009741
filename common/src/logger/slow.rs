use std::future::Future;
use std::time::{Duration, Instant};

/// Awaits `fut` and emits a warning under the `performance` target when it
/// takes longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_the_inner_output() {
        let out = warn_if_slow("unit", Duration::from_secs(1), async { 41 + 1 }).await;
        assert_eq!(out, 42);
    }
}
