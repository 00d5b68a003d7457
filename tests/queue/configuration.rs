//! TOML configuration driving queue behaviour

use crate::common::int_message;
use smq::queue::api::{Message, Queue, QueueConfig, QueueError};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_queue_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("smq.toml");
    fs::write(
        &path,
        "[queue]\nlock_timeout_ms = 75\nmax_message_bytes = 8\n",
    )
    .unwrap();

    let config = QueueConfig::load(&path).unwrap();
    let queue = Queue::with_config(config).unwrap();
    assert_eq!(queue.timeout(), Duration::from_millis(75));

    assert!(queue.enqueue(int_message(1)).is_ok());
    let err = queue
        .enqueue(Message::new(vec![0u8; 9]).unwrap())
        .unwrap_err();
    assert!(matches!(err.error(), QueueError::ContractViolation { .. }));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_malformed_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("smq.toml");
    fs::write(&path, "[queue\nlock_timeout_ms = 75\n").unwrap();

    match QueueConfig::load(&path) {
        Err(QueueError::Configuration { message }) => {
            assert!(message.contains("smq.toml"), "got: {}", message);
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
}
