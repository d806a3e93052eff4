//! Replay-one observable values.
//!
//! An [`Observable`] owns a current value and a list of subscribers. New
//! subscribers immediately receive the current value, then every value
//! published after they subscribed, synchronously and in subscription order.
//! Historical values are never replayed.
//!
//! ```
//! use mlk_shop_storefront::observable::Observable;
//!
//! let count = Observable::new(0_u32);
//! let sub = count.subscribe(|n| println!("count is now {n}"));
//! count.set(1);
//! sub.unsubscribe();
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A shared, subscribable value.
///
/// Cloning an `Observable` yields another handle to the same value.
pub struct Observable<T> {
    inner: Arc<ObservableInner<T>>,
}

struct ObservableInner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        let subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Observable")
            .field("value", &*value)
            .field("subscribers", &subscribers)
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Create an observable holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(ObservableInner {
                value: RwLock::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current value and deliver it to every subscriber.
    ///
    /// Callbacks run after all locks are released, so a callback may read
    /// the observable (or subscribe to it) without deadlocking.
    pub fn set(&self, value: T) {
        *self
            .inner
            .value
            .write()
            .unwrap_or_else(PoisonError::into_inner) = value.clone();
        self.publish(&value);
    }

    /// Register `callback`, invoking it right away with the current value.
    ///
    /// The returned [`Subscription`] detaches the callback when dropped or
    /// when [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<T> = Arc::new(callback);

        let current = self.get();
        callback(&current);

        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));

        let weak: Weak<ObservableInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .subscribers
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .retain(|(sub_id, _)| *sub_id != id);
                }
            })),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Derive an observable whose value is `f` applied to this one.
    ///
    /// The derived value is republished every time this observable changes.
    /// The link lives as long as the returned [`Subscription`].
    pub fn map<U, F>(&self, f: F) -> (Observable<U>, Subscription)
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let derived = Observable::new(f(&self.get()));
        let target = derived.clone();
        let subscription = self.subscribe(move |value| target.set(f(value)));
        (derived, subscription)
    }

    fn publish(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(value);
        }
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Handle returned by [`Observable::subscribe`].
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving values.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    /// Keep the callback attached for the rest of the observable's life.
    pub fn forget(mut self) {
        self.detach = None;
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |v: &T| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(v.clone());
        })
    }

    fn snapshot<T: Clone>(seen: &Arc<Mutex<Vec<T>>>) -> Vec<T> {
        seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[test]
    fn test_subscribe_replays_current_value() {
        let obs = Observable::new(7);
        obs.set(8);
        let (seen, cb) = recorder();
        let _sub = obs.subscribe(cb);
        assert_eq!(snapshot(&seen), vec![8]);
    }

    #[test]
    fn test_values_delivered_in_order() {
        let obs = Observable::new(0);
        let (seen, cb) = recorder();
        let _sub = obs.subscribe(cb);
        obs.set(1);
        obs.set(2);
        assert_eq!(snapshot(&seen), vec![0, 1, 2]);
    }

    #[test]
    fn test_subscribers_called_in_subscription_order() {
        let obs = Observable::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);
        let _a = obs.subscribe(move |v| {
            first
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(("a", *v));
        });
        let _b = obs.subscribe(move |v| {
            second
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(("b", *v));
        });
        obs.set(5);
        let got = order.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(got, vec![("a", 0), ("b", 0), ("a", 5), ("b", 5)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let obs = Observable::new(0);
        let (seen, cb) = recorder();
        let sub = obs.subscribe(cb);
        obs.set(1);
        sub.unsubscribe();
        obs.set(2);
        assert_eq!(snapshot(&seen), vec![0, 1]);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes_and_forget_keeps() {
        let obs = Observable::new(0);
        {
            let _sub = obs.subscribe(|_| {});
        }
        assert_eq!(obs.subscriber_count(), 0);

        obs.subscribe(|_| {}).forget();
        assert_eq!(obs.subscriber_count(), 1);
    }

    #[test]
    fn test_callback_may_read_observable() {
        let obs = Observable::new(1);
        let reader = obs.clone();
        let (seen, cb) = recorder();
        let _sub = obs.subscribe(move |_| cb(&reader.get()));
        obs.set(3);
        assert_eq!(snapshot(&seen), vec![1, 3]);
    }

    #[test]
    fn test_map_follows_source() {
        let obs = Observable::new(2);
        let (doubled, _link) = obs.map(|v| v * 2);
        assert_eq!(doubled.get(), 4);
        obs.set(5);
        assert_eq!(doubled.get(), 10);
    }
}
