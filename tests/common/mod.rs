//! Common test utilities and helpers
//!
//! Message builders and retry settings shared by the integration tests.

use smq::core::retry::RetryPolicy;
use smq::queue::api::Message;
use std::time::Duration;

/// Build a 4-byte little-endian message carrying `value`
pub fn int_message(value: u32) -> Message {
    Message::new(value.to_le_bytes().to_vec()).expect("non-empty payload")
}

/// Decode a message built by [`int_message`]
pub fn read_int(message: &Message) -> u32 {
    let bytes: [u8; 4] = message.data().try_into().expect("4-byte payload");
    u32::from_le_bytes(bytes)
}

/// Policy for producers that keep going until the consumer lets them in
pub fn persistent_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: usize::MAX,
        delay: Duration::ZERO,
    }
}
