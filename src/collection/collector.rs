/*!
 * Event Collector
 * Many producers, one aggregation worker, one published batch
 *
 * Producers close their events and hand the closed forms to a bounded queue
 * (blocking when it is full). A single named worker thread owns the growing
 * batch, so only the queue hand-off is synchronized. Shutdown closes the
 * queue, joins the worker once it has drained everything already queued, and
 * publishes the batch exactly once.
 *
 * Batch order is queue arrival order. Arrival order between concurrent
 * producers is a race and must not be relied upon.
 */

use super::queue::{EventQueue, Producer};
use crate::config::TelemetryConfig;
use crate::core::errors::{CollectorError, CollectorResult, QueueError};
use crate::core::limits::MAX_QUEUE_CAPACITY;
use crate::core::types::EventId;
use crate::events::{ClientEvent, Event};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// Collector statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorStats {
    pub events_submitted: u64,
    pub events_rejected: u64,
    pub queued: usize,
    pub capacity: usize,
    pub shut_down: bool,
}

/// Aggregates closed events from any number of threads into one batch
pub struct Collector {
    queue: EventQueue<ClientEvent>,
    worker: Mutex<Option<JoinHandle<Vec<ClientEvent>>>>,
    published: OnceLock<Arc<[ClientEvent]>>,
    submitted: Arc<AtomicU64>,
    rejected: AtomicU64,
}

impl Collector {
    /// Start a collector sized and named from `config`
    pub fn new(config: &TelemetryConfig) -> CollectorResult<Self> {
        let capacity = config.queue_capacity;
        if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
            return Err(CollectorError::InvalidCapacity(capacity));
        }

        let queue = EventQueue::bounded(capacity);
        let consumer = queue.consumer();

        let worker = std::thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || {
                let mut events = Vec::new();
                for event in consumer.drain() {
                    events.push(event);
                }
                debug!(events = events.len(), "aggregation worker drained queue");
                events
            })
            .map_err(|e| CollectorError::WorkerSpawn(e.to_string()))?;

        info!(capacity, worker = %config.worker_name, "event collector started");

        Ok(Self {
            queue,
            worker: Mutex::new(Some(worker)),
            published: OnceLock::new(),
            submitted: Arc::new(AtomicU64::new(0)),
            rejected: AtomicU64::new(0),
        })
    }

    /// Start a collector with default settings and the given queue capacity
    pub fn with_capacity(capacity: usize) -> CollectorResult<Self> {
        Self::new(&TelemetryConfig::default().with_queue_capacity(capacity))
    }

    /// Close `event` and queue its closed form, blocking while the queue is full.
    ///
    /// # Panics
    ///
    /// On a contract violation: submitting after shutdown has begun, or
    /// submitting an event that was already closed. Use
    /// [`try_close_event_and_add`](Self::try_close_event_and_add) to get the
    /// error instead.
    #[track_caller]
    pub fn close_event_and_add(&self, event: &Event) {
        if let Err(e) = self.try_close_event_and_add(event) {
            panic!("{}", e);
        }
    }

    /// Fallible [`close_event_and_add`](Self::close_event_and_add).
    ///
    /// Fails with [`CollectorError::ShutDown`] once shutdown has begun; the
    /// event is left open in that case. A second submission of the same event
    /// fails with the event's illegal-state error.
    pub fn try_close_event_and_add(&self, event: &Event) -> CollectorResult<()> {
        let producer = self.producer()?;
        let closed = event.try_close().map_err(|e| self.reject(e.into()))?;
        let event_id = closed.id;
        producer.send(closed).map_err(|e| self.reject(e.into()))?;
        record_submitted(&self.submitted, event_id);
        Ok(())
    }

    /// Async variant of [`close_event_and_add`](Self::close_event_and_add);
    /// waits for queue space without blocking the runtime thread.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// On the same contract violations as the blocking variant.
    pub async fn close_event_and_add_async(&self, event: &Event) {
        if let Err(e) = self.try_close_event_and_add_async(event).await {
            panic!("{}", e);
        }
    }

    /// Fallible [`close_event_and_add_async`](Self::close_event_and_add_async).
    ///
    /// Once the event is closed its hand-off runs on a detached task, so
    /// dropping the returned future cannot lose the event: it still reaches
    /// the batch, and shutdown waits for it.
    pub async fn try_close_event_and_add_async(&self, event: &Event) -> CollectorResult<()> {
        let producer = self.producer()?;
        let closed = event.try_close().map_err(|e| self.reject(e.into()))?;

        let submitted = Arc::clone(&self.submitted);
        let handoff = tokio::spawn(async move {
            let event_id = closed.id;
            producer.send_async(closed).await?;
            record_submitted(&submitted, event_id);
            Ok::<(), QueueError>(())
        });

        match handoff.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(self.reject(e.into())),
            Err(_) => Err(self.reject(CollectorError::HandoffAborted)),
        }
    }

    /// Stop accepting events, wait for the worker to drain the queue and
    /// return the final batch.
    ///
    /// # Panics
    ///
    /// If shutdown was already requested, or the aggregation worker
    /// panicked. Use [`events`](Self::events) to read the batch again, or
    /// [`try_shutdown`](Self::try_shutdown) to get the error instead.
    #[track_caller]
    pub fn shutdown(&self) -> Arc<[ClientEvent]> {
        match self.try_shutdown() {
            Ok(batch) => batch,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible [`shutdown`](Self::shutdown).
    ///
    /// Only the first call succeeds; later calls fail with
    /// [`CollectorError::AlreadyShutDown`].
    pub fn try_shutdown(&self) -> CollectorResult<Arc<[ClientEvent]>> {
        if !self.queue.close() {
            warn!("duplicate collector shutdown rejected");
            return Err(CollectorError::AlreadyShutDown);
        }

        let worker = self.worker.lock().take();
        let events = match worker {
            Some(handle) => handle.join().map_err(|_| {
                error!("aggregation worker panicked");
                CollectorError::WorkerPanicked
            })?,
            None => Vec::new(),
        };

        let batch: Arc<[ClientEvent]> = events.into();
        let batch = Arc::clone(self.published.get_or_init(|| batch));

        info!(
            events = batch.len(),
            submitted = self.submitted.load(Ordering::Relaxed),
            "event collector shut down"
        );
        Ok(batch)
    }

    /// Published batch; `None` until shutdown has completed
    pub fn events(&self) -> Option<Arc<[ClientEvent]>> {
        self.published.get().cloned()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Closed events waiting for the worker
    #[inline]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_shut_down(&self) -> bool {
        self.queue.is_closed()
    }

    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            events_submitted: self.submitted.load(Ordering::Relaxed),
            events_rejected: self.rejected.load(Ordering::Relaxed),
            queued: self.queue.len(),
            capacity: self.queue.capacity(),
            shut_down: self.queue.is_closed(),
        }
    }

    fn producer(&self) -> CollectorResult<Producer<ClientEvent>> {
        self.queue.producer().map_err(|e| match e {
            QueueError::Closed => {
                warn!("event submitted after collector shutdown");
                self.reject(CollectorError::ShutDown)
            }
            other => self.reject(other.into()),
        })
    }

    #[inline]
    fn reject(&self, err: CollectorError) -> CollectorError {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        err
    }
}

#[inline]
fn record_submitted(submitted: &AtomicU64, event_id: EventId) {
    submitted.fetch_add(1, Ordering::Relaxed);
    debug!(event_id = %event_id, "event queued");
}

impl Drop for Collector {
    fn drop(&mut self) {
        if !self.queue.close() {
            return;
        }
        if let Some(handle) = self.worker.get_mut().take() {
            match handle.join() {
                Ok(events) if !events.is_empty() => {
                    warn!(
                        events = events.len(),
                        "collector dropped without shutdown, discarding events"
                    );
                }
                Ok(_) => {}
                Err(_) => error!("aggregation worker panicked"),
            }
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("stats", &self.stats())
            .finish()
    }
}
