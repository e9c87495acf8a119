//! Single-flight session renewal.
//!
//! Any number of requests can discover an expired access credential at
//! the same time. The first one to report it becomes the leader and runs
//! the renewal; everyone else parks a deferred result handle in a FIFO
//! queue. When the leader settles, the queue is drained in the same
//! critical section that clears the `refreshing` flag, so a request that
//! arrives afterwards starts a new episode instead of joining a finished
//! one.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

use crate::error::RefreshError;

/// Result of one renewal: the new access credential, or why there is none.
pub type RefreshOutcome = Result<String, RefreshError>;

/// A request waiting on the in-flight renewal.
#[derive(Debug)]
struct PendingRequest {
    id: u64,
    reply: oneshot::Sender<RefreshOutcome>,
}

/// Flag plus queue. The queue is non-empty only while `refreshing`.
#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    queue: VecDeque<PendingRequest>,
    next_id: u64,
}

enum Role {
    Leader,
    Follower(u64, oneshot::Receiver<RefreshOutcome>),
}

/// What a caller of [`TokenRefreshCoordinator::refresh_or_wait`] gets back.
#[derive(Debug)]
pub struct Settlement {
    /// New access credential or the shared failure.
    pub outcome: RefreshOutcome,
    /// Whether this caller ran the renewal. Exactly one caller per episode
    /// sees `true`, which is where once-per-episode side effects belong.
    pub led: bool,
}

/// Guarantees at most one renewal in flight and replays or fails every
/// waiting request when it settles.
///
/// Each [`ApiClient`](crate::client::ApiClient) owns its own coordinator;
/// there is no process-wide state.
#[derive(Debug, Default)]
pub struct TokenRefreshCoordinator {
    state: Mutex<RefreshState>,
    episodes: AtomicU64,
}

impl TokenRefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a renewal is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of requests waiting on the in-flight renewal.
    pub fn pending_len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of renewals started over the coordinator's lifetime.
    pub fn episodes(&self) -> u64 {
        self.episodes.load(Ordering::SeqCst)
    }

    /// Run `renew` if no renewal is in flight, otherwise wait for the one
    /// that is.
    ///
    /// `renew` is only called by the leader. Followers receive the leader's
    /// outcome, in the order they queued. If the leader's future is dropped
    /// before `renew` completes, its followers rejoin: the first of them
    /// leads a new episode with its own `renew`, so an abandoned episode
    /// never reaches a caller as a failure.
    pub async fn refresh_or_wait<F, Fut>(&self, renew: F) -> Settlement
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        loop {
            match self.join() {
                Role::Follower(id, reply) => {
                    tracing::debug!(pending_id = id, "Waiting on in-flight session refresh");
                    match reply.await {
                        Ok(Err(RefreshError::Abandoned)) | Err(_) => {
                            tracing::debug!(pending_id = id, "Session refresh abandoned, rejoining");
                        }
                        Ok(outcome) => return Settlement { outcome, led: false },
                    }
                }
                Role::Leader => {
                    let mut guard = LeaderGuard {
                        coordinator: self,
                        settled: false,
                    };
                    let outcome = renew().await;
                    guard.settle(&outcome);
                    return Settlement { outcome, led: true };
                }
            }
        }
    }

    /// Check-and-set the flag, or enqueue, as one critical section.
    fn join(&self) -> Role {
        let mut state = self.lock();
        if state.refreshing {
            let (reply, receiver) = oneshot::channel();
            let id = state.next_id;
            state.next_id += 1;
            state.queue.push_back(PendingRequest { id, reply });
            Role::Follower(id, receiver)
        } else {
            state.refreshing = true;
            self.episodes.fetch_add(1, Ordering::SeqCst);
            Role::Leader
        }
    }

    /// Leave the refreshing state and drain the queue FIFO.
    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let mut state = self.lock();
        state.refreshing = false;
        let drained = state.queue.len();
        while let Some(pending) = state.queue.pop_front() {
            // A follower that went away has nothing left to deliver to.
            if pending.reply.send(outcome.clone()).is_err() {
                tracing::debug!(pending_id = pending.id, "Queued request dropped before refresh settled");
            }
        }
        drained
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles the episode even if the leader's future is dropped mid-renewal.
struct LeaderGuard<'a> {
    coordinator: &'a TokenRefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    fn settle(&mut self, outcome: &RefreshOutcome) {
        let drained = self.coordinator.settle(outcome);
        self.settled = true;
        match outcome {
            Ok(_) => tracing::info!(replayed = drained, "Session refreshed"),
            Err(err) => tracing::warn!(rejected = drained, "Session refresh failed: {}", err),
        }
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(&Err(RefreshError::Abandoned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    async fn wait_for_pending(coordinator: &TokenRefreshCoordinator, n: usize) {
        while coordinator.pending_len() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_single_caller_leads() {
        let coordinator = TokenRefreshCoordinator::new();
        let settlement = coordinator
            .refresh_or_wait(|| async { Ok("fresh".to_string()) })
            .await;

        assert!(settlement.led);
        assert_eq!(settlement.outcome, Ok("fresh".to_string()));
        assert!(!coordinator.is_refreshing());
        assert_eq!(coordinator.episodes(), 1);
    }

    #[tokio::test]
    async fn test_followers_share_one_renewal() {
        let coordinator = Arc::new(TokenRefreshCoordinator::new());
        let (release, released) = oneshot::channel::<()>();

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async move {
                        let _ = released.await;
                        Ok("fresh".to_string())
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let mut followers = Vec::new();
        for _ in 0..3 {
            let coordinator = coordinator.clone();
            followers.push(tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async { Ok::<_, RefreshError>("unused".to_string()) })
                    .await
            }));
        }
        wait_for_pending(&coordinator, 3).await;

        release.send(()).unwrap();

        assert!(leader.await.unwrap().led);
        for follower in followers {
            let settlement = follower.await.unwrap();
            assert!(!settlement.led);
            assert_eq!(settlement.outcome, Ok("fresh".to_string()));
        }
        assert_eq!(coordinator.episodes(), 1);
        assert_eq!(coordinator.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_follower() {
        let coordinator = Arc::new(TokenRefreshCoordinator::new());
        let (release, released) = oneshot::channel::<()>();

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async move {
                        let _ = released.await;
                        Err(RefreshError::MissingRenewalCredential)
                    })
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let follower = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async { Ok("unused".to_string()) })
                    .await
            })
        };
        wait_for_pending(&coordinator, 1).await;
        release.send(()).unwrap();

        assert_eq!(
            leader.await.unwrap().outcome,
            Err(RefreshError::MissingRenewalCredential)
        );
        assert_eq!(
            follower.await.unwrap().outcome,
            Err(RefreshError::MissingRenewalCredential)
        );
    }

    // Single-threaded so followers run in the order the drain wakes them.
    #[tokio::test(flavor = "current_thread")]
    async fn test_fifo_drain_order() {
        let coordinator = Arc::new(TokenRefreshCoordinator::new());
        let order = Arc::new(Mutex::new(Vec::new()));
        let (release, released) = oneshot::channel::<()>();

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async move {
                        let _ = released.await;
                        Ok("fresh".to_string())
                    })
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        // Enqueue sequentially so arrival order is known.
        let mut followers = Vec::new();
        for i in 0..4 {
            let follower_coordinator = coordinator.clone();
            let order = order.clone();
            followers.push(tokio::spawn(async move {
                let settlement = follower_coordinator
                    .refresh_or_wait(|| async { Ok(String::new()) })
                    .await;
                order.lock().unwrap().push(i);
                settlement
            }));
            wait_for_pending(&coordinator, i + 1).await;
        }

        // Each pending id was assigned in arrival order and the drain
        // walks the queue front to back.
        {
            let state = coordinator.lock();
            let ids: Vec<u64> = state.queue.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![0, 1, 2, 3]);
        }

        release.send(()).unwrap();
        leader.await.unwrap();
        for follower in followers {
            follower.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_new_episode_after_settle() {
        let coordinator = TokenRefreshCoordinator::new();
        coordinator
            .refresh_or_wait(|| async { Err(RefreshError::Abandoned) })
            .await;
        let second = coordinator
            .refresh_or_wait(|| async { Ok("again".to_string()) })
            .await;

        assert!(second.led);
        assert_eq!(coordinator.episodes(), 2);
    }

    #[tokio::test]
    async fn test_dropped_leader_hands_over_to_follower() {
        let coordinator = Arc::new(TokenRefreshCoordinator::new());

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok("never".to_string())
                    })
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let follower = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async { Ok("takeover".to_string()) })
                    .await
            })
        };
        wait_for_pending(&coordinator, 1).await;

        leader.abort();
        let _ = leader.await;

        let settlement = follower.await.unwrap();
        assert!(settlement.led);
        assert_eq!(settlement.outcome, Ok("takeover".to_string()));
        assert_eq!(coordinator.episodes(), 2);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_abandoned_episode_keeps_queue_order() {
        let coordinator = Arc::new(TokenRefreshCoordinator::new());

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok("never".to_string())
                    })
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let (release, released) = oneshot::channel::<()>();
        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async move {
                        let _ = released.await;
                        Ok("second".to_string())
                    })
                    .await
            })
        };
        wait_for_pending(&coordinator, 1).await;
        let second = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async { Ok("unused".to_string()) })
                    .await
            })
        };
        wait_for_pending(&coordinator, 2).await;

        leader.abort();
        let _ = leader.await;

        // One of the two takes over; the other queues behind it.
        wait_for_pending(&coordinator, 1).await;
        release.send(()).unwrap();

        let first = first.await.unwrap();
        let second = second.await.unwrap();
        assert_eq!(first.outcome, Ok("second".to_string()));
        assert!(first.led);
        assert_eq!(second.outcome, Ok("second".to_string()));
        assert!(!second.led);
        assert_eq!(coordinator.episodes(), 2);
    }

    #[tokio::test]
    async fn test_dropped_follower_is_skipped() {
        let coordinator = Arc::new(TokenRefreshCoordinator::new());
        let (release, released) = oneshot::channel::<()>();

        let leader = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async move {
                        let _ = released.await;
                        Ok("fresh".to_string())
                    })
                    .await
            })
        };
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let follower = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_or_wait(|| async { Ok(String::new()) })
                    .await
            })
        };
        wait_for_pending(&coordinator, 1).await;
        follower.abort();
        let _ = follower.await;

        release.send(()).unwrap();
        assert_eq!(leader.await.unwrap().outcome, Ok("fresh".to_string()));
    }
}
