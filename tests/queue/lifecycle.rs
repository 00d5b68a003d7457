//! Handle lifecycle through the public API

use crate::common::{int_message, read_int};
use smq::queue::api::{DestroyOutcome, Disposal, Message, Queue, QueueError};

#[test]
fn test_fifo_then_teardown() {
    let queue = Queue::new();
    for value in [5, 3, 9, 1] {
        queue.enqueue(int_message(value)).unwrap();
    }

    let drained: Vec<u32> = std::iter::from_fn(|| queue.dequeue().unwrap())
        .map(|m| read_int(&m))
        .collect();
    assert_eq!(drained, vec![5, 3, 9, 1]);

    assert_eq!(
        queue.destroy().unwrap(),
        DestroyOutcome::TornDown { drained: 0 }
    );
}

#[test]
fn test_last_holder_frees_resident_messages() {
    let queue = Queue::new();
    let second = queue.duplicate().unwrap();
    let third = second.duplicate().unwrap();
    assert_eq!(queue.handle_count().unwrap(), 3);

    for value in 0..3 {
        third.enqueue(int_message(value)).unwrap();
    }

    assert_eq!(
        queue.destroy().unwrap(),
        DestroyOutcome::Released {
            remaining_handles: 2
        }
    );
    assert_eq!(
        third.destroy().unwrap(),
        DestroyOutcome::Released {
            remaining_handles: 1
        }
    );
    // Still fully usable from the last handle
    assert_eq!(second.len(), 3);
    assert_eq!(read_int(&second.dequeue().unwrap().unwrap()), 0);

    assert_eq!(
        second.destroy().unwrap(),
        DestroyOutcome::TornDown { drained: 2 }
    );
}

#[test]
fn test_rejected_input_leaves_length_unchanged() {
    let queue = Queue::new();
    queue.enqueue(int_message(1)).unwrap();

    assert!(matches!(
        Message::new(""),
        Err(QueueError::ContractViolation { .. })
    ));
    assert!(matches!(
        Message::copy_from_slice(&[]),
        Err(QueueError::ContractViolation { .. })
    ));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_message_disposal_modes() {
    let queue = Queue::new();
    let buffer = b"caller keeps this".to_vec();
    queue.enqueue(Message::new(buffer).unwrap()).unwrap();

    let message = queue.dequeue().unwrap().unwrap();
    assert_eq!(message.sequence(), Some(1));
    let kept = message.destroy(Disposal::ContainerOnly).unwrap();
    assert_eq!(kept, b"caller keeps this");

    queue.enqueue(Message::new(kept).unwrap()).unwrap();
    let message = queue.dequeue().unwrap().unwrap();
    assert!(message.destroy(Disposal::All).is_none());
}

#[test]
fn test_empty_dequeue_on_fresh_queue() {
    let queue = Queue::new();
    assert!(queue.dequeue().unwrap().is_none());
    assert!(queue.is_empty());
}
