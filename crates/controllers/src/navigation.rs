//! Route targets, the navigation event bus and its one-shot subscription.

use shared::domain::{DocumentId, FileId};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

pub const EDIT_USER_STATE: &str = "settings.user.edit";
pub const FILE_STATE: &str = "document.view.content.file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    EditUser {
        username: String,
    },
    File {
        document_id: DocumentId,
        file_id: FileId,
    },
    /// Any other page, by state name.
    Other(String),
}

impl NavigationTarget {
    pub fn state_name(&self) -> &str {
        match self {
            Self::EditUser { .. } => EDIT_USER_STATE,
            Self::File { .. } => FILE_STATE,
            Self::Other(name) => name,
        }
    }
}

pub trait Navigator: Send + Sync {
    fn go(&self, target: NavigationTarget);
    fn current_state(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    TransitionStart { to: NavigationTarget },
    StateChangeSuccess { current: NavigationTarget },
}

impl NavigationEvent {
    pub fn is_transition_start(&self) -> bool {
        matches!(self, Self::TransitionStart { .. })
    }
}

#[derive(Debug, Clone)]
pub struct NavigationBus {
    tx: broadcast::Sender<NavigationEvent>,
}

impl Default for NavigationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl NavigationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns how many subscribers saw the event.
    pub fn publish(&self, event: NavigationEvent) -> usize {
        debug!(?event, "publishing navigation event");
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn subscribe_once(&self, filter: fn(&NavigationEvent) -> bool) -> OnceSubscription {
        OnceSubscription {
            rx: self.tx.subscribe(),
            filter,
        }
    }
}

/// Delivers the first event accepted by `filter`, then unsubscribes.
///
/// `recv` consumes the subscription, so the underlying receiver is dropped
/// as soon as the event is delivered or the bus goes away.
pub struct OnceSubscription {
    rx: broadcast::Receiver<NavigationEvent>,
    filter: fn(&NavigationEvent) -> bool,
}

impl OnceSubscription {
    pub async fn recv(mut self) -> Option<NavigationEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if (self.filter)(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "navigation subscription lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
