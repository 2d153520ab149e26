//! Reducer-backed state containers and their dispatch handles.
//!
//! A container owns one state value and a queue of actions that have been
//! dispatched but not applied yet. [`Dispatch::send`] only enqueues and
//! tells the [`Scheduler`]; the root later drains every scheduled container
//! with [`PendingUpdates::apply_pending`], folding queued actions through
//! the reducer in the order they were sent.

use simple_provider_core::reducer::Reducer;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::Notify;

/// Something holding queued updates that the root must apply
pub(crate) trait PendingUpdates: Send + Sync {
    /// Apply everything queued; `true` if the state handle changed
    fn apply_pending(&self) -> bool;
}

trait ActionSink<A>: Send + Sync {
    fn enqueue(&self, action: A);
}

/// Work list shared between a root and every dispatch handle it created
#[derive(Default)]
pub(crate) struct Scheduler {
    pending: Mutex<Vec<Weak<dyn PendingUpdates>>>,
    notify: Notify,
}

impl Scheduler {
    fn schedule(&self, target: Weak<dyn PendingUpdates>) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target);
        self.notify.notify_one();
    }

    /// Take the current work list, leaving it empty
    pub(crate) fn take(&self) -> Vec<Weak<dyn PendingUpdates>> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Resolves once the work list is non-empty
    pub(crate) async fn notified(&self) {
        while !self.has_pending() {
            self.notify.notified().await;
        }
    }
}

/// One state value governed by one reducer
pub(crate) struct ReducerContainer<R: Reducer> {
    reducer: R,
    state: Mutex<Arc<R::State>>,
    queue: Mutex<VecDeque<R::Action>>,
}

impl<R> ReducerContainer<R>
where
    R: Reducer + Send + Sync + 'static,
    R::State: Send + Sync + 'static,
    R::Action: Send + 'static,
{
    /// Create a container and the dispatch handle bound to it
    pub(crate) fn create(
        reducer: R,
        initial_state: Arc<R::State>,
        scheduler: &Arc<Scheduler>,
    ) -> (Arc<Self>, Dispatch<R::Action>) {
        let container = Arc::new(Self {
            reducer,
            state: Mutex::new(initial_state),
            queue: Mutex::new(VecDeque::new()),
        });

        let sink: Arc<dyn ActionSink<R::Action>> = container.clone();
        let target: Arc<dyn PendingUpdates> = container.clone();
        let dispatch = Dispatch {
            inner: Arc::new(DispatchInner {
                sink: Arc::downgrade(&sink),
                target: Arc::downgrade(&target),
                scheduler: Arc::downgrade(scheduler),
            }),
        };

        (container, dispatch)
    }

    /// Latest committed state
    pub(crate) fn state(&self) -> Arc<R::State> {
        Arc::clone(&self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<R> ActionSink<R::Action> for ReducerContainer<R>
where
    R: Reducer + Send + Sync,
    R::State: Send + Sync,
    R::Action: Send,
{
    fn enqueue(&self, action: R::Action) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(action);
    }
}

impl<R> PendingUpdates for ReducerContainer<R>
where
    R: Reducer + Send + Sync,
    R::State: Send + Sync,
    R::Action: Send,
{
    fn apply_pending(&self) -> bool {
        // Drain first: the queue lock is never held while the reducer runs.
        let actions: Vec<R::Action> = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        if actions.is_empty() {
            return false;
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let before = Arc::clone(&state);
        for action in actions {
            let next = self.reducer.reduce(Arc::clone(&state), action);
            *state = next;
        }

        let changed = !Arc::ptr_eq(&before, &state);
        tracing::trace!(changed, "Applied queued actions");
        changed
    }
}

struct DispatchInner<A> {
    sink: Weak<dyn ActionSink<A>>,
    target: Weak<dyn PendingUpdates>,
    scheduler: Weak<Scheduler>,
}

/// Handle used to request state transitions
///
/// Cloning is cheap and every clone shares the same identity: two handles
/// compare equal exactly when they were produced by the same container.
/// A container hands out one identity for its whole lifetime.
///
/// `send` is fire-and-forget. The new state becomes visible on the next
/// flush of the root that owns the container.
pub struct Dispatch<A> {
    inner: Arc<DispatchInner<A>>,
}

impl<A> Dispatch<A> {
    /// Request a transition
    ///
    /// Actions sent after the owning provider unmounted are dropped with a
    /// warning.
    pub fn send(&self, action: A) {
        let (Some(sink), Some(scheduler)) =
            (self.inner.sink.upgrade(), self.inner.scheduler.upgrade())
        else {
            tracing::warn!("Dropped action dispatched to an unmounted container");
            metrics::counter!("provider.dispatch.dropped").increment(1);
            return;
        };

        sink.enqueue(action);
        scheduler.schedule(self.inner.target.clone());
        metrics::counter!("provider.dispatch.total").increment(1);
        tracing::trace!("Action queued");
    }

    /// Whether both handles belong to the same container
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the owning container is still mounted
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.sink.strong_count() > 0
    }
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> PartialEq for Dispatch<A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A> Eq for Dispatch<A> {}

impl<A> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("action", &std::any::type_name::<A>())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_provider_core::reducer::from_fn;

    fn adder() -> impl Reducer<State = i64, Action = i64> + Send + Sync + 'static {
        from_fn(|state: Arc<i64>, delta: i64| {
            if delta == 0 {
                state
            } else {
                Arc::new(*state + delta)
            }
        })
    }

    #[test]
    fn test_send_queues_until_applied() {
        let scheduler = Arc::new(Scheduler::default());
        let (container, dispatch) = ReducerContainer::create(adder(), Arc::new(0), &scheduler);

        dispatch.send(5);
        assert_eq!(*container.state(), 0);
        assert!(scheduler.has_pending());

        assert!(container.apply_pending());
        assert_eq!(*container.state(), 5);
    }

    #[test]
    fn test_actions_fold_in_order() {
        let scheduler = Arc::new(Scheduler::default());
        let (container, dispatch) = ReducerContainer::create(
            from_fn(|state: Arc<Vec<u8>>, item: u8| {
                let mut next = (*state).clone();
                next.push(item);
                Arc::new(next)
            }),
            Arc::new(Vec::new()),
            &scheduler,
        );

        for item in [3, 1, 2] {
            dispatch.send(item);
        }
        container.apply_pending();

        assert_eq!(*container.state(), vec![3, 1, 2]);
    }

    #[test]
    fn test_identity_transition_reports_unchanged() {
        let scheduler = Arc::new(Scheduler::default());
        let (container, dispatch) = ReducerContainer::create(adder(), Arc::new(9), &scheduler);
        let before = container.state();

        dispatch.send(0);

        assert!(!container.apply_pending());
        assert!(Arc::ptr_eq(&before, &container.state()));
    }

    #[test]
    fn test_dispatch_after_drop_is_ignored() {
        let scheduler = Arc::new(Scheduler::default());
        let (container, dispatch) = ReducerContainer::create(adder(), Arc::new(0), &scheduler);
        let copy = dispatch.clone();

        drop(container);
        copy.send(1);

        assert!(!dispatch.is_connected());
        assert!(!scheduler.has_pending());
        assert_eq!(dispatch, copy);
    }
}
