//! Synchronous topic-based event bus.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};

use game_core::{GameEvent, GameEventKind};
use thiserror::Error;

/// Subscription filter.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Every event.
    All,
    Kind(GameEventKind),
}

impl Topic {
    pub fn matches(self, event: &GameEvent) -> bool {
        match self {
            Topic::All => true,
            Topic::Kind(kind) => event.kind() == kind,
        }
    }
}

impl From<GameEventKind> for Topic {
    fn from(kind: GameEventKind) -> Self {
        Topic::Kind(kind)
    }
}

/// Failure reported by a subscriber. It is logged and never reaches the
/// publisher or the other subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("handler panicked")]
    Panicked,
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Delivery tally for one published event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

type Handler = Box<dyn FnMut(&GameEvent) -> Result<(), HandlerError>>;

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler,
}

/// Topic-based event bus
///
/// Handlers run in subscription order on the publishing thread. The most
/// recent events are kept in a bounded history for late readers.
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    history: VecDeque<GameEvent>,
    history_limit: usize,
    next_id: u64,
}

impl EventBus {
    pub const DEFAULT_HISTORY_LIMIT: usize = 100;

    pub fn new() -> Self {
        Self::with_history_limit(Self::DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            subscriptions: Vec::new(),
            history: VecDeque::with_capacity(history_limit),
            history_limit,
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, topic: impl Into<Topic>, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Result<(), HandlerError> + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            topic: topic.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Records the event and hands it to every matching handler. A handler
    /// that fails or panics is logged and skipped.
    pub fn publish(&mut self, event: GameEvent) -> PublishReport {
        let kind = event.kind();
        let mut report = PublishReport::default();

        for sub in self.subscriptions.iter_mut().filter(|sub| sub.topic.matches(&event)) {
            let outcome = catch_unwind(AssertUnwindSafe(|| (sub.handler)(&event)))
                .unwrap_or(Err(HandlerError::Panicked));
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::error!(
                        target: "runtime::events",
                        subscription = sub.id.0,
                        %kind,
                        error = %err,
                        "event handler failed"
                    );
                }
            }
        }

        if self.history_limit > 0 {
            if self.history.len() == self.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(event);
        }
        tracing::trace!(target: "runtime::events", %kind, delivered = report.delivered, "published");
        report
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &GameEvent> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use game_core::EntityId;

    use super::*;

    fn round(round: u64) -> GameEvent {
        GameEvent::RoundStarted { round }
    }

    #[test]
    fn topic_and_wildcard_subscribers_see_matching_events() {
        let mut bus = EventBus::new();
        let rounds = Rc::new(RefCell::new(Vec::new()));
        let everything = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&rounds);
        bus.subscribe(GameEventKind::RoundStarted, move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
        let counter = Rc::clone(&everything);
        bus.subscribe(Topic::All, move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        bus.publish(round(2));
        bus.publish(GameEvent::ActiveChanged {
            combatant: EntityId(1),
        });

        assert_eq!(*rounds.borrow(), vec![round(2)]);
        assert_eq!(*everything.borrow(), 2);
    }

    #[test]
    fn failing_handlers_do_not_stop_delivery() {
        let mut bus = EventBus::new();
        let reached = Rc::new(RefCell::new(false));

        bus.subscribe(Topic::All, |_| Err(HandlerError::failed("disk full")));
        bus.subscribe(Topic::All, |_| panic!("handler bug"));
        let flag = Rc::clone(&reached);
        bus.subscribe(Topic::All, move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        let report = bus.publish(round(1));
        assert_eq!(report, PublishReport { delivered: 1, failed: 2 });
        assert!(*reached.borrow());
    }

    #[test]
    fn history_keeps_the_latest_events() {
        let mut bus = EventBus::with_history_limit(3);
        for n in 1..=5 {
            bus.publish(round(n));
        }
        let kept: Vec<_> = bus.history().cloned().collect();
        assert_eq!(kept, vec![round(3), round(4), round(5)]);

        bus.clear_history();
        assert_eq!(bus.history().count(), 0);
    }

    #[test]
    fn default_history_is_capped_at_one_hundred() {
        let mut bus = EventBus::new();
        for n in 0..150 {
            bus.publish(round(n));
        }
        assert_eq!(bus.history().count(), 100);
        assert_eq!(bus.history().next(), Some(&round(50)));
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(Topic::All, |_| Ok(()));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.publish(round(1)).delivered, 0);
    }
}
