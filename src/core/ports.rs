// Ports define what the core needs from the outside world, without implementing it.
//
// Purpose
// - Describe abstract input and output capabilities as traits
//   (stores on each side, the publisher, the log subscription).
//
// Responsibilities
// - Keep the core independent of any database or broker by coding against traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the
//   adapters layer.
//
// Testing guidance
// - Provide in memory implementations for tests and local development.

use crate::core::event::EventEnvelope;
use crate::core::order::Order;
use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

/// Authoritative key-value store for orders. Owned by the command side only.
#[async_trait]
pub trait OrderWriteStore: Send + Sync {
    async fn save(&self, order: Order) -> Result<(), StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Order>, StoreError>;
}

/// Denormalized projection store, rebuilt purely from events. Written by the
/// projector, read by the query handler.
#[async_trait]
pub trait OrderReadStore: Send + Sync {
    async fn upsert(&self, order: Order) -> Result<(), StoreError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Order>, StoreError>;
    async fn list_all(&self) -> Result<Vec<Order>, StoreError>;
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publisher not started")]
    NotStarted,

    #[error("publish timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Durably appends envelopes to the log, at least once. Send-and-confirm: the
/// call returns once the log acknowledged receipt, or fails. No internal retry.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn start(&self) -> Result<(), PublishError>;
    async fn stop(&self) -> Result<(), PublishError>;
    async fn publish(&self, envelope: &EventEnvelope) -> Result<(), PublishError>;
}

/// Where a fresh subscription begins reading the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartOffset {
    /// Replay the whole log. Required to rebuild the read store from empty.
    #[default]
    Earliest,
    /// Skip history. Only safe when the read store is already warm.
    Latest,
}

impl FromStr for StartOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => Ok(StartOffset::Earliest),
            "latest" => Ok(StartOffset::Latest),
            other => Err(format!(
                "unknown start offset {other:?}, expected \"earliest\" or \"latest\""
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("subscriber not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Transport(String),
}

/// One raw message as delivered by the log, body untrusted.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub offset: u64,
    pub body: Vec<u8>,
}

/// Single-partition, ordered, replayable subscription. Offsets are committed
/// explicitly by the consumer loop after a message has been handled.
#[async_trait]
pub trait LogSubscriber: Send + Sync {
    async fn connect(&self, start: StartOffset) -> Result<(), SubscribeError>;
    async fn next_message(&self) -> Result<RawMessage, SubscribeError>;
    async fn commit(&self, offset: u64) -> Result<(), SubscribeError>;
    async fn disconnect(&self) -> Result<(), SubscribeError>;
}

#[cfg(test)]
mod start_offset_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("earliest", StartOffset::Earliest)]
    #[case("latest", StartOffset::Latest)]
    fn it_should_parse_a_known_policy(#[case] input: &str, #[case] expected: StartOffset) {
        assert_eq!(input.parse::<StartOffset>().unwrap(), expected);
    }

    #[rstest]
    fn it_should_reject_an_unknown_policy() {
        let result = "newest".parse::<StartOffset>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("newest"));
    }
}
