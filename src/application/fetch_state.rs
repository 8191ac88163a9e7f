// Fetch lifecycle state machine shared by all dashboard state containers.
//
// Per resource key only the most recently initiated fetch commits: refresh
// bumps the cell's generation token, and a load whose captured generation
// no longer matches at commit time is discarded. Loads for one cell are
// serialized by an async lock, which doubles as request coalescing for the
// mount path (ensure).
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};

use crate::error::{ApiError, Result};

#[derive(Debug, Clone)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    /// A refresh is running while the previous payload stays visible.
    Revalidating(T),
    /// Failed load. `stale` keeps the last good payload so presentation can
    /// show data next to the error banner.
    Error { message: String, stale: Option<T> },
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) | FetchState::Revalidating(data) => Some(data),
            FetchState::Error { stale, .. } => stale.as_ref(),
            _ => None,
        }
    }

    pub fn is_validating(&self) -> bool {
        matches!(self, FetchState::Loading | FetchState::Revalidating(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    fn has_data(&self) -> bool {
        matches!(self, FetchState::Success(_) | FetchState::Revalidating(_))
    }
}

pub struct FetchCell<T> {
    state: RwLock<FetchState<T>>,
    load_lock: Mutex<()>,
    generation: AtomicU64,
}

impl<T: Clone> Default for FetchCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FetchCell<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(FetchState::Idle),
            load_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> FetchState<T> {
        self.state.read().await.clone()
    }

    /// Mount-path load: serve the cache when present, otherwise load.
    /// Concurrent callers coalesce on the load lock instead of issuing a
    /// duplicate request for the same resource.
    pub async fn ensure<F, Fut>(&self, loader: F) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.state.read().await.has_data() {
            return self.snapshot().await;
        }
        let _guard = self.load_lock.lock().await;
        // A coalesced caller may find the data already loaded here.
        if self.state.read().await.has_data() {
            return self.snapshot().await;
        }
        let generation = self.generation.load(Ordering::SeqCst);
        self.run_load(generation, loader).await
    }

    /// Explicit refresh: supersedes any in-flight load. The superseded
    /// load's response is discarded when it eventually resolves.
    pub async fn refresh<F, Fut>(&self, loader: F) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.load_lock.lock().await;
        self.run_load(generation, loader).await
    }

    async fn run_load<F, Fut>(&self, generation: u64, loader: F) -> FetchState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let mut state = self.state.write().await;
            *state = match std::mem::take(&mut *state) {
                FetchState::Success(data) | FetchState::Revalidating(data) => {
                    FetchState::Revalidating(data)
                }
                FetchState::Error { stale: Some(data), .. } => FetchState::Revalidating(data),
                _ => FetchState::Loading,
            };
        }

        let result = loader().await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding superseded fetch response");
            return state.clone();
        }
        *state = match result {
            Ok(data) => FetchState::Success(data),
            Err(err) => Self::error_state(std::mem::take(&mut *state), &err),
        };
        state.clone()
    }

    /// Mutate the cached payload in place, e.g. to merge a confirmed write
    /// without a refetch. No-op (returns false) when no payload is cached.
    pub async fn update(&self, mutate: impl FnOnce(&mut T)) -> bool {
        let mut state = self.state.write().await;
        match &mut *state {
            FetchState::Success(data) | FetchState::Revalidating(data) => {
                mutate(data);
                true
            }
            FetchState::Error { stale: Some(data), .. } => {
                mutate(data);
                true
            }
            _ => false,
        }
    }

    fn error_state(previous: FetchState<T>, err: &ApiError) -> FetchState<T> {
        let stale = match previous {
            FetchState::Success(data) | FetchState::Revalidating(data) => Some(data),
            FetchState::Error { stale, .. } => stale,
            _ => None,
        };
        tracing::warn!("dashboard load failed: {err}");
        FetchState::Error {
            message: err.user_message(),
            stale,
        }
    }
}

/// Resource-key → cell map used by the role services.
pub struct CellMap<T> {
    cells: RwLock<HashMap<String, Arc<FetchCell<T>>>>,
}

impl<T: Clone> Default for CellMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> CellMap<T> {
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
        }
    }

    pub async fn cell(&self, key: &str) -> Arc<FetchCell<T>> {
        if let Some(cell) = self.cells.read().await.get(key) {
            return cell.clone();
        }
        let mut cells = self.cells.write().await;
        cells
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(FetchCell::new()))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn successful_load_transitions_to_success() {
        let cell = FetchCell::new();
        let state = cell.ensure(|| async { Ok(41) }).await;
        assert!(matches!(state, FetchState::Success(41)));
    }

    #[tokio::test]
    async fn ensure_serves_cache_without_reloading() {
        let cell = FetchCell::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            cell.ensure(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("payload")
            })
            .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_ensures_coalesce_into_one_request() {
        let cell = Arc::new(FetchCell::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();

        let slow_cell = cell.clone();
        let slow_calls = calls.clone();
        let slow = tokio::spawn(async move {
            slow_cell
                .ensure(|| async move {
                    slow_calls.fetch_add(1, Ordering::SeqCst);
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    Ok(1)
                })
                .await
        });

        started_rx.await.unwrap();
        let fast_cell = cell.clone();
        let fast_calls = calls.clone();
        let fast = tokio::spawn(async move {
            fast_cell
                .ensure(|| async move {
                    fast_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(2)
                })
                .await
        });

        release_tx.send(()).unwrap();
        let first = slow.await.unwrap();
        let second = fast.await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(first, FetchState::Success(1)));
        assert!(matches!(second, FetchState::Success(1)));
    }

    #[tokio::test]
    async fn newer_refresh_discards_the_older_response() {
        let cell = Arc::new(FetchCell::new());
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();

        let first_cell = cell.clone();
        let first = tokio::spawn(async move {
            first_cell
                .refresh(|| async move {
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    Ok("first")
                })
                .await
        });

        started_rx.await.unwrap();
        let second_cell = cell.clone();
        let second = tokio::spawn(async move {
            second_cell.refresh(|| async { Ok("second") }).await
        });

        // Let the second refresh queue on the load lock, then resolve the
        // first response late.
        tokio::task::yield_now().await;
        release_tx.send(()).unwrap();
        first.await.unwrap();
        second.await.unwrap();

        let committed = cell.snapshot().await;
        assert_eq!(committed.data(), Some(&"second"));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_last_good_payload() {
        let cell = FetchCell::new();
        cell.refresh(|| async { Ok("good") }).await;
        let state = cell
            .refresh(|| async { Err::<&str, _>(ApiError::Network("connection reset".into())) })
            .await;

        assert_eq!(state.data(), Some(&"good"));
        assert_eq!(state.error_message(), Some("network error: connection reset"));
        assert!(!state.is_validating());
    }

    #[tokio::test]
    async fn hard_failure_without_prior_data_has_no_stale_payload() {
        let cell: FetchCell<&str> = FetchCell::new();
        let state = cell
            .refresh(|| async { Err(ApiError::Server("boom".into())) })
            .await;
        assert!(state.data().is_none());
        assert!(state.error_message().is_some());
    }

    #[tokio::test]
    async fn refresh_keeps_stale_data_visible_while_revalidating() {
        let cell = Arc::new(FetchCell::new());
        cell.refresh(|| async { Ok("v1") }).await;

        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let refresh_cell = cell.clone();
        let refresh = tokio::spawn(async move {
            refresh_cell
                .refresh(|| async move {
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    Ok("v2")
                })
                .await
        });

        started_rx.await.unwrap();
        let mid_flight = cell.snapshot().await;
        assert!(mid_flight.is_validating());
        assert_eq!(mid_flight.data(), Some(&"v1"));

        release_tx.send(()).unwrap();
        let state = refresh.await.unwrap();
        assert_eq!(state.data(), Some(&"v2"));
    }

    #[tokio::test]
    async fn cell_map_reuses_cells_per_key() {
        let map: CellMap<u32> = CellMap::new();
        let a = map.cell("student-1").await;
        let b = map.cell("student-1").await;
        let c = map.cell("student-2").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
