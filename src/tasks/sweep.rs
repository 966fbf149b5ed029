//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::{SharedCache, MAX_ENTRY_TTL};

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The first sweep happens one full interval after spawning. The task stops
/// as soon as `shutdown` is cancelled; await the returned handle to wait for
/// it to finish.
///
/// # Example
/// ```ignore
/// let token = CancellationToken::new();
/// let handle = spawn_sweep_task(cache.clone(), Duration::from_secs(600), token.clone());
/// // Later, during shutdown:
/// token.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweep_task(
    cache: SharedCache,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache sweep task with interval of {:?}", interval);

        // Keep deadline arithmetic inside Instant's range
        let interval = interval.min(MAX_ENTRY_TTL);
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Cache sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let (removed, stats) = {
                let mut guard = cache.write().await;
                let removed = guard.sweep();
                (removed, guard.stats())
            };

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
            debug!(
                entries = stats.total_entries,
                hits = stats.hits,
                misses = stats.misses,
                evictions = stats.evictions,
                hit_rate = stats.hit_rate(),
                "Cache statistics"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, CachedResponse};

    const LONG_TTL: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = CacheStore::new(LONG_TTL, None).into_shared();
        cache.write().await.put_with_ttl(
            "/3/movie/1".to_string(),
            CachedResponse::ok(None, "{}"),
            Duration::from_millis(50),
        );

        let token = CancellationToken::new();
        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(100), token.clone());

        tokio::time::sleep(Duration::from_millis(350)).await;

        // Checked without `get`, so only the sweep could have removed it
        assert!(!cache.read().await.contains_key("/3/movie/1"));
        assert_eq!(cache.read().await.stats().expirations, 1);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let cache = CacheStore::new(LONG_TTL, None).into_shared();
        cache
            .write()
            .await
            .put("/3/movie/2".to_string(), CachedResponse::ok(None, "{}"));

        let token = CancellationToken::new();
        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50), token.clone());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(cache.write().await.get("/3/movie/2").is_some());

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_survives_huge_interval() {
        let cache = CacheStore::new(LONG_TTL, None).into_shared();
        let token = CancellationToken::new();
        let handle = spawn_sweep_task(cache, Duration::from_secs(u64::MAX), token.clone());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_task_stops_on_cancel() {
        let cache = CacheStore::new(LONG_TTL, None).into_shared();
        let token = CancellationToken::new();
        let handle = spawn_sweep_task(cache, Duration::from_secs(600), token.clone());

        token.cancel();

        let finished = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(finished.is_ok(), "Task should finish promptly after cancel");
    }
}
