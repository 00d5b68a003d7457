//! Tests for queue handle lifecycle and reference-counted teardown

#[cfg(test)]
mod tests {
    use crate::queue::api::{DestroyOutcome, Message, Queue, QueueConfig, QueueError};
    use std::time::Duration;

    #[test]
    fn test_new_queue_has_one_handle() {
        let queue = Queue::new();
        assert_eq!(queue.handle_count().unwrap(), 1);
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_refcount_teardown() {
        let queue = Queue::new();
        let duplicate = queue.duplicate().unwrap();
        assert_eq!(queue.handle_count().unwrap(), 2);
        assert_eq!(queue.id(), duplicate.id());

        queue.enqueue(Message::new("one").unwrap()).unwrap();
        queue.enqueue(Message::new("two").unwrap()).unwrap();

        // First destroy leaves the queue usable through the other handle
        assert_eq!(
            queue.destroy().unwrap(),
            DestroyOutcome::Released {
                remaining_handles: 1
            }
        );
        assert_eq!(duplicate.len(), 2);
        assert_eq!(duplicate.dequeue().unwrap().unwrap().data(), b"one");
        duplicate.enqueue(Message::new("three").unwrap()).unwrap();
        assert_eq!(duplicate.handle_count().unwrap(), 1);

        // Final destroy frees what is left
        assert_eq!(
            duplicate.destroy().unwrap(),
            DestroyOutcome::TornDown { drained: 2 }
        );
    }

    #[test]
    fn test_dropped_handle_releases_its_reference() {
        let queue = Queue::new();
        {
            let _duplicate = queue.duplicate().unwrap();
            assert_eq!(queue.handle_count().unwrap(), 2);
        }
        assert_eq!(queue.handle_count().unwrap(), 1);
        assert_eq!(
            queue.destroy().unwrap(),
            DestroyOutcome::TornDown { drained: 0 }
        );
    }

    #[test]
    fn test_handle_dropped_while_locked_still_counts() {
        let config = QueueConfig::default().with_lock_timeout(Duration::from_millis(10));
        let queue = Queue::with_config(config).unwrap();
        let duplicate = queue.duplicate().unwrap();
        queue.enqueue(Message::new("resident").unwrap()).unwrap();

        let held = queue.shared().lock().unwrap();
        drop(duplicate);
        drop(held);

        assert_eq!(queue.handle_count().unwrap(), 1);
        assert_eq!(
            queue.destroy().unwrap(),
            DestroyOutcome::TornDown { drained: 1 }
        );
    }

    #[test]
    fn test_duplicate_fails_while_locked() {
        let config = QueueConfig::default().with_lock_timeout(Duration::from_millis(10));
        let queue = Queue::with_config(config).unwrap();

        let held = queue.shared().lock().unwrap();
        assert!(matches!(
            queue.duplicate(),
            Err(QueueError::LockTimeout { .. })
        ));
        drop(held);

        assert_eq!(queue.handle_count().unwrap(), 1);
    }

    #[test]
    fn test_failed_destroy_returns_usable_handle() {
        let config = QueueConfig::default().with_lock_timeout(Duration::from_millis(10));
        let queue = Queue::with_config(config).unwrap();
        let duplicate = queue.duplicate().unwrap();
        queue.enqueue(Message::new("kept").unwrap()).unwrap();

        let held = queue.shared().lock().unwrap();
        let err = duplicate.destroy().unwrap_err();
        assert!(err.error().is_transient());
        drop(held);

        // The reference was not given up
        let duplicate = err.into_queue();
        assert_eq!(queue.handle_count().unwrap(), 2);
        assert_eq!(duplicate.dequeue().unwrap().unwrap().data(), b"kept");

        assert!(matches!(
            duplicate.destroy(),
            Ok(DestroyOutcome::Released { .. })
        ));
        assert!(matches!(
            queue.destroy(),
            Ok(DestroyOutcome::TornDown { .. })
        ));
    }

    #[test]
    fn test_repeated_create_destroy() {
        for i in 0..10_000 {
            let queue = Queue::new();
            let data = format!("a quick brown fox {}", i);
            queue.enqueue(Message::new(data.clone()).unwrap()).unwrap();
            let message = queue.dequeue().unwrap().unwrap();
            assert_eq!(message.data(), data.as_bytes());
            assert!(queue.destroy().is_ok());
        }
    }

    #[test]
    fn test_debug_output() {
        let queue = Queue::new();
        let debug = format!("{:?}", queue);
        assert!(debug.contains("Queue"));
        assert!(debug.contains("locked: false"));
    }
}
