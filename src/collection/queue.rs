/*!
 * Bounded Queue
 * Blocking MPSC hand-off between event producers and the aggregation worker
 *
 * Design: producers borrow a short-lived send handle; closing the queue
 * revokes the shared sender, so the consumer observes disconnection as soon
 * as every in-flight producer has delivered.
 */

use crate::core::errors::{QueueError, QueueResult};
use parking_lot::RwLock;

/// Bounded FIFO queue with blocking send on full and blocking receive on empty
pub struct EventQueue<T> {
    sender: RwLock<Option<flume::Sender<T>>>,
    receiver: flume::Receiver<T>,
    capacity: usize,
}

impl<T> EventQueue<T> {
    /// Create a queue holding at most `capacity` items
    ///
    /// A capacity of zero makes every send a rendezvous with the consumer.
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity);
        Self {
            sender: RwLock::new(Some(sender)),
            receiver,
            capacity,
        }
    }

    /// Send handle, or `QueueError::Closed` once the queue was closed
    pub fn producer(&self) -> QueueResult<Producer<T>> {
        self.sender
            .read()
            .as_ref()
            .map(|sender| Producer {
                sender: sender.clone(),
                capacity: self.capacity,
            })
            .ok_or(QueueError::Closed)
    }

    /// Receive handle for the consuming side
    pub fn consumer(&self) -> Consumer<T> {
        Consumer {
            receiver: self.receiver.clone(),
        }
    }

    /// Stop accepting producers. Returns true only for the first call.
    pub fn close(&self) -> bool {
        self.sender.write().take().is_some()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items currently buffered
    #[inline]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Short-lived send handle; keeps the queue open until dropped
pub struct Producer<T> {
    sender: flume::Sender<T>,
    capacity: usize,
}

impl<T> Producer<T> {
    /// Send, blocking while the queue is full
    pub fn send(self, item: T) -> QueueResult<()> {
        self.sender
            .send(item)
            .map_err(|_| QueueError::Disconnected)
    }

    /// Send without blocking
    pub fn try_send(self, item: T) -> QueueResult<()> {
        self.sender.try_send(item).map_err(|e| match e {
            flume::TrySendError::Full(_) => QueueError::Full(self.capacity),
            flume::TrySendError::Disconnected(_) => QueueError::Disconnected,
        })
    }

    /// Send, yielding to the runtime while the queue is full
    pub async fn send_async(self, item: T) -> QueueResult<()> {
        self.sender
            .send_async(item)
            .await
            .map_err(|_| QueueError::Disconnected)
    }
}

/// Receive handle
pub struct Consumer<T> {
    receiver: flume::Receiver<T>,
}

impl<T> Consumer<T> {
    /// Next item; blocks while empty, `None` once closed and drained
    pub fn recv(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Iterate until the queue is closed and drained
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        self.receiver.iter()
    }
}
