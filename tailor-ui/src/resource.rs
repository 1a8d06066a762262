//! Load tasks: owned, cancellable fetches with observable state.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Error type for load failures, shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResourceError {
    pub message: String,
}

impl ResourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ResourceError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ResourceError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// The state of a loadable value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResourceState<T> {
    /// Nothing requested yet, or the last load was cancelled.
    #[default]
    Idle,
    Loading,
    Ready(T),
    Error(ResourceError),
}

impl<T> ResourceState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ResourceError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ResourceState<U> {
        match self {
            Self::Idle => ResourceState::Idle,
            Self::Loading => ResourceState::Loading,
            Self::Ready(v) => ResourceState::Ready(f(v)),
            Self::Error(e) => ResourceState::Error(e),
        }
    }
}

/// Shared, thread-safe [`ResourceState`].
///
/// Cheap to clone; every clone sees the same state. A dirty flag lets a
/// polling loop redraw only after a change.
#[derive(Debug)]
pub struct Resource<T> {
    inner: Arc<RwLock<ResourceState<T>>>,
    dirty: Arc<AtomicBool>,
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ResourceState::Idle)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A clone of the current state.
    pub fn get(&self) -> ResourceState<T>
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(ResourceState::Idle)
    }

    /// Run `f` against the current state without cloning it.
    pub fn with<U>(&self, f: impl FnOnce(&ResourceState<T>) -> U) -> Option<U> {
        self.inner.read().ok().map(|guard| f(&guard))
    }

    pub fn set_idle(&self) {
        self.set(ResourceState::Idle);
    }

    pub fn set_loading(&self) {
        self.set(ResourceState::Loading);
    }

    pub fn set_ready(&self, value: T) {
        self.set(ResourceState::Ready(value));
    }

    pub fn set_error(&self, err: impl Into<ResourceError>) {
        self.set(ResourceState::Error(err.into()));
    }

    fn set(&self, state: ResourceState<T>) {
        self.set_if(state, || true);
    }

    /// Replace the state only if `keep` still holds once the lock is taken.
    fn set_if(&self, state: ResourceState<T>, keep: impl FnOnce() -> bool) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if !keep() {
            return false;
        }
        *guard = state;
        self.dirty.store(true, Ordering::SeqCst);
        true
    }

    /// Whether the state changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.with(ResourceState::is_loading).unwrap_or(false)
    }

    pub fn is_ready(&self) -> bool {
        self.with(ResourceState::is_ready).unwrap_or(false)
    }

    pub fn is_error(&self) -> bool {
        self.with(ResourceState::is_error).unwrap_or(false)
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

/// A fetch owned by a page.
///
/// [`start`](LoadTask::start) spawns the future on the tokio runtime and
/// moves the state to `Loading`. Starting again supersedes the running load:
/// its token is cancelled and, should it still finish, its result is
/// dropped. Dropping the task cancels whatever is in flight.
///
/// # Example
///
/// ```ignore
/// let mut employees = LoadTask::new();
/// employees.start(async move { client.employees().list().await });
///
/// // each frame
/// if employees.resource().take_dirty() {
///     if let ResourceState::Ready(rows) = employees.state() {
///         table.set_data(rows);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct LoadTask<T> {
    resource: Resource<T>,
    generation: Arc<AtomicU64>,
    owner: CancellationToken,
    current: Option<CancellationToken>,
}

impl<T> LoadTask<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_owner(CancellationToken::new())
    }

    /// Loads are children of `owner`; cancelling it cancels every load.
    pub fn with_owner(owner: CancellationToken) -> Self {
        Self {
            resource: Resource::new(),
            generation: Arc::new(AtomicU64::new(0)),
            owner,
            current: None,
        }
    }

    pub fn resource(&self) -> &Resource<T> {
        &self.resource
    }

    pub fn state(&self) -> ResourceState<T>
    where
        T: Clone,
    {
        self.resource.get()
    }

    pub fn is_loading(&self) -> bool {
        self.resource.is_loading()
    }

    /// Spawn `fut`, superseding any load still running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, E>(&mut self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let token = self.owner.child_token();
        self.current = Some(token.clone());

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.resource.set_loading();
        log::debug!("load #{} started", generation);

        let resource = self.resource.clone();
        let latest = Arc::clone(&self.generation);
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    log::debug!("load #{} cancelled", generation);
                    return;
                }
                result = fut => result,
            };
            let state = match result {
                Ok(value) => ResourceState::Ready(value),
                Err(e) => {
                    log::warn!("load #{} failed: {}", generation, e);
                    ResourceState::Error(ResourceError::new(e.to_string()))
                }
            };
            let applied = resource.set_if(state, || {
                !token.is_cancelled() && latest.load(Ordering::SeqCst) == generation
            });
            if !applied {
                log::debug!("load #{} superseded; result discarded", generation);
            }
        })
    }

    /// Cancel the running load. A load that was in flight leaves the state
    /// `Idle`; a finished result is kept.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let was_loading = self.resource.is_loading();
        if was_loading {
            self.resource
                .set_if(ResourceState::Idle, || latest.load(Ordering::SeqCst) == generation);
        }
    }
}

impl<T> Default for LoadTask<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LoadTask<T> {
    fn drop(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn test_state_helpers() {
        let state: ResourceState<i32> = ResourceState::Ready(3);
        assert!(state.is_ready());
        assert_eq!(state.clone().map(|v| v * 2), ResourceState::Ready(6));
        assert_eq!(state.as_ready(), Some(&3));
        let err: ResourceState<i32> = ResourceState::Error("boom".into());
        assert_eq!(err.as_error().map(|e| e.message.as_str()), Some("boom"));
    }

    #[test]
    fn test_resource_dirty_flag() {
        let resource = Resource::<u8>::new();
        assert!(!resource.is_dirty());
        resource.set_ready(1);
        assert!(resource.take_dirty());
        assert!(!resource.take_dirty());
    }

    #[tokio::test]
    async fn test_load_ready() {
        let mut task = LoadTask::new();
        let handle = task.start(async { Ok::<_, String>(vec![1, 2, 3]) });
        handle.await.unwrap();
        assert_eq!(task.state(), ResourceState::Ready(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_load_error() {
        let mut task = LoadTask::<Vec<u8>>::new();
        let handle = task.start(async { Err::<Vec<u8>, _>("connection refused") });
        handle.await.unwrap();
        assert_eq!(
            task.state(),
            ResourceState::Error(ResourceError::new("connection refused"))
        );
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let mut task = LoadTask::new();
        let (first_tx, first_rx) = oneshot::channel::<u32>();
        let (second_tx, second_rx) = oneshot::channel::<u32>();

        let first = task.start(async move { first_rx.await.map_err(|e| e.to_string()) });
        let second = task.start(async move { second_rx.await.map_err(|e| e.to_string()) });

        second_tx.send(2).unwrap();
        second.await.unwrap();
        // the first load was cancelled; its receiver may already be gone
        let _ = first_tx.send(1);
        first.await.unwrap();

        assert_eq!(task.state(), ResourceState::Ready(2));
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let mut task = LoadTask::<u32>::new();
        let (_tx, rx) = oneshot::channel::<u32>();
        let handle = task.start(async move { rx.await.map_err(|e| e.to_string()) });
        assert!(task.is_loading());
        task.cancel();
        handle.await.unwrap();
        assert!(task.state().is_idle());
    }

    #[tokio::test]
    async fn test_drop_cancels_in_flight_load() {
        let mut task = LoadTask::<u32>::new();
        let resource = task.resource().clone();
        let (tx, rx) = oneshot::channel::<u32>();
        let handle = task.start(async move { rx.await.map_err(|e| e.to_string()) });
        drop(task);
        handle.await.unwrap();
        assert!(tx.is_closed());
        assert!(resource.is_loading());
    }

    #[tokio::test]
    async fn test_owner_cancel_stops_loads() {
        let owner = CancellationToken::new();
        let mut task = LoadTask::<u32>::with_owner(owner.clone());
        let (_tx, rx) = oneshot::channel::<u32>();
        let handle = task.start(async move { rx.await.map_err(|e| e.to_string()) });
        owner.cancel();
        handle.await.unwrap();
        assert!(task.is_loading());
    }
}
