//! Synchronous per-job publish/subscribe, used for `status_changed` and
//! `uploading_results_concluded`.
//!
//! Handlers run synchronously, in subscription order, against a snapshot of
//! the subscriber list taken before dispatch starts — so a handler can
//! unsubscribe itself or another handler without disturbing the in-flight
//! dispatch.

use std::collections::HashMap;

/// Well-known events emitted by [`crate::job::Job`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    StatusChanged { status: crate::job::JobStatus },
    UploadingResultsConcluded,
}

/// Opaque handle returned by [`EventBus::on`]/[`EventBus::once`], used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

struct Subscriber<E> {
    token: SubscriptionToken,
    once: bool,
    handler: Box<dyn FnMut(&E) + Send>,
}

/// Named event dispatcher. One instance lives on each [`crate::job::Job`].
pub struct EventBus<E> {
    subscribers: HashMap<&'static str, Vec<Subscriber<E>>>,
    next_token: u64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self { subscribers: HashMap::new(), next_token: 0 }
    }

    fn next(&mut self) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        token
    }

    /// Subscribe to `name`. The handler fires on every future `emit(name, ..)`.
    pub fn on(&mut self, name: &'static str, handler: impl FnMut(&E) + Send + 'static) -> SubscriptionToken {
        let token = self.next();
        self.subscribers.entry(name).or_default().push(Subscriber {
            token,
            once: false,
            handler: Box::new(handler),
        });
        token
    }

    /// Subscribe to `name`; the handler fires at most once, then is dropped.
    pub fn once(&mut self, name: &'static str, handler: impl FnMut(&E) + Send + 'static) -> SubscriptionToken {
        let token = self.next();
        self.subscribers.entry(name).or_default().push(Subscriber {
            token,
            once: true,
            handler: Box::new(handler),
        });
        token
    }

    /// Remove a subscription. A no-op if the token is unknown or already fired.
    pub fn unsubscribe(&mut self, name: &str, token: SubscriptionToken) {
        if let Some(subs) = self.subscribers.get_mut(name) {
            subs.retain(|s| s.token != token);
        }
    }

    /// Dispatch `data` to every current subscriber of `name`, in subscription
    /// order. The subscriber list is detached from the map before any handler
    /// runs, so re-entrant `on`/`unsubscribe` calls from within a handler (via
    /// shared state the handler closes over) can't observe a partial dispatch.
    pub fn emit(&mut self, name: &'static str, data: E) {
        let Some(mut subs) = self.subscribers.remove(name) else { return };
        for sub in subs.iter_mut() {
            (sub.handler)(&data);
        }
        subs.retain(|s| !s.once);
        if !subs.is_empty() {
            self.subscribers.insert(name, subs);
        }
    }

    /// Number of live subscribers for `name` (test helper).
    #[cfg(test)]
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.get(name).map_or(0, |v| v.len())
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
