use crate::domain::transaction::Transaction;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Receives a snapshot of the active transaction after every state change.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    receiver: UnboundedReceiver<Transaction>,
}

impl Subscription {
    /// Waits for the next snapshot. `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<Transaction> {
        self.receiver.recv().await
    }

    /// Returns a snapshot that is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<Transaction> {
        self.receiver.try_recv().ok()
    }

    /// Every snapshot queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Fan-out list of subscriber channels.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriptionId, UnboundedSender<Transaction>)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        self.senders.push((id, sender));
        Subscription { id, receiver }
    }

    /// Removes a subscriber. Unknown or already removed ids are ignored.
    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.senders.retain(|(existing, _)| *existing != id);
    }

    /// Sends a copy of `snapshot` to everyone, dropping closed channels.
    pub(crate) fn publish(&mut self, snapshot: &Transaction) {
        self.senders
            .retain(|(_, sender)| sender.send(snapshot.clone()).is_ok());
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}
