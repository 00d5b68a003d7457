//! Producer/consumer threads sharing one queue

use crate::common::{int_message, persistent_policy, read_int};
use smq::core::retry::{retry, retry_enqueue, RetryPolicy};
use smq::queue::api::{Queue, QueueConfig};
use std::thread;
use std::time::Duration;

const TEST_RUNS: u32 = 1000;

#[test]
fn test_threaded_producer_consumer() {
    let config = QueueConfig::default().with_lock_timeout(Duration::from_millis(5));
    let queue = Queue::with_config(config).unwrap();

    let pusher_queue = queue.duplicate().unwrap();
    let pusher = thread::spawn(move || {
        let mut pushed = 0;
        for i in 0..TEST_RUNS {
            retry_enqueue(&pusher_queue, int_message(i), &persistent_policy()).unwrap();
            pushed += 1;
        }
        pusher_queue.destroy().unwrap();
        pushed
    });

    let puller_queue = queue.duplicate().unwrap();
    let puller = thread::spawn(move || {
        let mut msg_count = 0u32;
        let mut last = None;
        while msg_count < TEST_RUNS {
            let Ok(Some(message)) = puller_queue.dequeue() else {
                continue;
            };
            assert_eq!(message.len(), 4);
            let value = read_int(&message);
            assert_eq!(value, msg_count, "out of order delivery");
            last = Some(value);
            msg_count += 1;
        }
        puller_queue.destroy().unwrap();
        (msg_count, last)
    });

    assert_eq!(pusher.join().unwrap(), TEST_RUNS);
    let (count, last) = puller.join().unwrap();
    assert_eq!(count, TEST_RUNS);
    assert_eq!(last, Some(TEST_RUNS - 1));

    assert_eq!(queue.len(), 0);
    queue.destroy().unwrap();
}

#[test]
fn test_consumer_with_retry_helper() {
    let config = QueueConfig::default().with_lock_timeout(Duration::from_millis(5));
    let queue = Queue::with_config(config).unwrap();
    let policy = RetryPolicy {
        max_attempts: 50,
        delay: Duration::from_millis(1),
    };

    let producer_queue = queue.duplicate().unwrap();
    let producer = thread::spawn(move || {
        for i in 0..100 {
            retry_enqueue(&producer_queue, int_message(i), &persistent_policy()).unwrap();
        }
        producer_queue.destroy().unwrap();
    });

    let mut received = Vec::new();
    while received.len() < 100 {
        if let Some(message) = retry("dequeue", &policy, || queue.dequeue()).unwrap() {
            received.push(read_int(&message));
        }
    }
    producer.join().unwrap();

    assert_eq!(received, (0..100).collect::<Vec<_>>());
    queue.destroy().unwrap();
}
