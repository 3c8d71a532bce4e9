//! In-flight Call Coalescing
//!
//! [`FlightGroup::work`] runs at most one computation per key at a time. The
//! first caller for a key becomes the leader and runs the closure; callers
//! arriving while it runs wait for its result instead of running their own.
//! Once the leader finishes, the entry is removed, so the next call starts a
//! fresh computation. Nothing is memoized across calls.
//!
//! If the leader's future is dropped before it produces a value, its entry is
//! removed and one of the waiters takes over as the new leader.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

struct Call<T> {
    done: watch::Sender<Option<T>>,
}

pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T: Clone> FlightGroup<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `func` for `key` unless a call for `key` is already in flight, in
    /// which case its result is shared.
    pub async fn work<F, Fut>(&self, key: &str, func: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let call = loop {
            let waiter = {
                let mut calls = self.calls.lock();
                match calls.get(key) {
                    Some(call) => call.done.subscribe(),
                    None => {
                        let (done, _) = watch::channel(None);
                        let call = Arc::new(Call { done });
                        calls.insert(key.to_string(), Arc::clone(&call));
                        break call;
                    }
                }
            };

            if let Some(value) = wait_for_result(waiter).await {
                return value;
            }
            tracing::debug!("In-flight call for {:?} was abandoned, retrying", key);
        };

        let leader = Leader {
            calls: &self.calls,
            key,
            call: &call,
        };

        let value = func().await;
        call.done.send_replace(Some(value.clone()));
        drop(leader);

        value
    }

    /// Number of keys with a computation currently running.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

impl<T: Clone> Default for FlightGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_for_result<T: Clone>(mut waiter: watch::Receiver<Option<T>>) -> Option<T> {
    let value = waiter.wait_for(Option::is_some).await.ok()?;
    value.as_ref().cloned()
}

/// Removes the leader's entry when it finishes or is dropped mid-flight.
struct Leader<'a, T> {
    calls: &'a Mutex<HashMap<String, Arc<Call<T>>>>,
    key: &'a str,
    call: &'a Arc<Call<T>>,
}

impl<T> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        let mut calls = self.calls.lock();
        if calls
            .get(self.key)
            .is_some_and(|current| Arc::ptr_eq(current, self.call))
        {
            calls.remove(self.key);
        }
    }
}
