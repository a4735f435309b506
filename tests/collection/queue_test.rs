/*!
 * Bounded Queue Tests
 */

use client_telemetry::collection::EventQueue;
use client_telemetry::QueueError;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_capacity_fills_without_blocking() {
    const CAPACITY: usize = 4;
    let queue = EventQueue::bounded(CAPACITY);

    for i in 0..CAPACITY {
        queue.producer().unwrap().try_send(i).unwrap();
    }
    assert_eq!(queue.len(), CAPACITY);
    assert_eq!(
        queue.producer().unwrap().try_send(CAPACITY),
        Err(QueueError::Full(CAPACITY))
    );
}

#[test]
fn test_backpressure_blocks_until_drained() {
    const CAPACITY: usize = 2;
    let queue = Arc::new(EventQueue::bounded(CAPACITY));

    for i in 0..CAPACITY {
        queue.producer().unwrap().send(i).unwrap();
    }

    let (done_tx, done_rx) = mpsc::channel();
    let blocked_queue = Arc::clone(&queue);
    let handle = thread::spawn(move || {
        blocked_queue.producer().unwrap().send(CAPACITY).unwrap();
        done_tx.send(()).unwrap();
    });

    // Extra item must wait for room
    assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());

    let consumer = queue.consumer();
    assert_eq!(consumer.recv(), Some(0));

    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("producer should unblock once an item is drained");
    handle.join().unwrap();

    queue.close();
    let rest: Vec<_> = consumer.drain().collect();
    assert_eq!(rest, vec![1, 2]);
}

#[test]
fn test_closed_queue_refuses_producers() {
    let queue: EventQueue<u8> = EventQueue::bounded(1);
    assert!(queue.close());
    assert!(matches!(queue.producer(), Err(QueueError::Closed)));
    assert_eq!(queue.consumer().recv(), None);
}

#[tokio::test]
async fn test_async_send_waits_for_room() {
    let queue = Arc::new(EventQueue::bounded(1));
    queue.producer().unwrap().send_async(1u32).await.unwrap();

    let sender_queue = Arc::clone(&queue);
    let pending = tokio::spawn(async move {
        sender_queue.producer().unwrap().send_async(2).await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!pending.is_finished());

    let consumer = queue.consumer();
    assert_eq!(consumer.try_recv(), Some(1));
    pending.await.unwrap().unwrap();
    assert_eq!(consumer.try_recv(), Some(2));
}
