// Observable per-view state
use std::sync::Arc;
use tokio::sync::watch;

/// A single value owned by one view. Every mutation notifies subscribers;
/// readers only ever see the last written value.
#[derive(Debug)]
pub struct ViewState<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone> ViewState<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update(&self, change: impl FnOnce(&mut T)) {
        self.tx.send_modify(change);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_notifies_subscribers() {
        let state = ViewState::new(0u32);
        let mut rx = state.subscribe();

        state.update(|v| *v += 5);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 5);

        state.set(9);
        assert_eq!(state.get(), 9);
        assert!(rx.has_changed().unwrap());
    }
}
