//! Change-notification channel.
//!
//! A [`Channel`] holds a current value and a bounded list of subscribers.
//! Publishing a value notifies subscribers **only when the value actually
//! changed** — a controller system can push its recomputed state every
//! frame without flooding the presentation layer with redundant
//! notifications. Subscribing returns a [`SubscriberToken`] used to
//! unsubscribe.
//!
//! Independent event categories (e.g. game state and score) are modeled as
//! independent channels, not variants of one.

/// Handle returned by [`Channel::subscribe`]; pass it to
/// [`Channel::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberToken(u64);

/// A typed value channel that notifies subscribers on change.
pub struct Channel<T> {
    value: T,
    subscribers: Vec<(SubscriberToken, Box<dyn FnMut(&T)>)>,
    next_token: u64,
}

impl<T: PartialEq> Channel<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            subscribers: Vec::new(),
            next_token: 0,
        }
    }

    /// The current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register a listener, called with the new value on every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriberToken {
        let token = SubscriberToken(self.next_token);
        self.next_token += 1;
        self.subscribers.push((token, Box::new(listener)));
        token
    }

    /// Remove a listener. Returns `false` if the token was already gone.
    pub fn unsubscribe(&mut self, token: SubscriberToken) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(t, _)| *t != token);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Update the value. Subscribers are notified only if `next` differs
    /// from the current value; returns whether a change occurred.
    pub fn publish(&mut self, next: T) -> bool {
        if self.value == next {
            return false;
        }
        self.value = next;
        for (_, listener) in &mut self.subscribers {
            listener(&self.value);
        }
        true
    }
}
