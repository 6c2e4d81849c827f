//! # Observable State Slots
//!
//! A value with a current snapshot and change notification, backed by
//! `tokio::sync::watch`.
//!
//! ```text
//! StoreManager                     Screens
//! ────────────                     ───────
//! slot.set(v) ──► watch::Sender ──► Receiver::changed().await
//!                                   Receiver::borrow().clone()
//! ```
//!
//! Subscribing hands out a receiver; dropping the receiver unsubscribes.
//! A receiver only ever sees the latest value, never a backlog.

use tokio::sync::watch;

/// Single-writer observable value.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Observable { tx }
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutates the value in place, notifying only if `f` returns true.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// New receiver positioned at the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_latest() {
        let slot = Observable::new(0);
        let mut rx = slot.subscribe();

        slot.set(1);
        slot.set(2);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 2);
        assert_eq!(slot.get(), 2);
    }

    #[test]
    fn test_update_only_notifies_on_change() {
        let slot = Observable::new(vec![1, 2]);
        let rx = slot.subscribe();

        assert!(!slot.update(|_| false));
        assert!(!rx.has_changed().unwrap());

        assert!(slot.update(|v| {
            v.push(3);
            true
        }));
        assert!(rx.has_changed().unwrap());
        assert_eq!(slot.get(), vec![1, 2, 3]);
    }

    #[test]
    fn test_set_without_subscribers() {
        let slot: Observable<Option<String>> = Observable::default();
        slot.set(Some("x".into()));
        assert_eq!(slot.get().as_deref(), Some("x"));
    }
}
