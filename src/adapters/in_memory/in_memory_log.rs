// In memory, single-partition message log with publisher and subscriber halves.
//
// Purpose
// - Exercise the whole pipeline without a broker. The log is an append-only
//   sequence of raw bodies; order is preserved and history is replayable, so
//   delivery is at least once from the consumer's point of view.
//
// Responsibilities
// - `InMemoryLog` owns the messages and wakes blocked subscribers on append.
// - `InMemoryLogPublisher` implements the explicit start/stop lifecycle and
//   send-and-confirm publish bounded by the configured timeout.
// - `InMemoryLogSubscriber` implements positioned reads with explicit commits.

use crate::core::event::EventEnvelope;
use crate::core::ports::{
    EventPublisher, LogSubscriber, PublishError, RawMessage, StartOffset, SubscribeError,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tracing::debug;

#[derive(Default)]
pub struct InMemoryLog {
    messages: RwLock<Vec<Vec<u8>>>,
    appended: Notify,
}

impl InMemoryLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Appends a raw body and returns its offset. Tests use this directly to
    /// inject malformed or duplicate messages.
    pub async fn append(&self, body: Vec<u8>) -> u64 {
        let mut messages = self.messages.write().await;
        messages.push(body);
        let offset = (messages.len() - 1) as u64;
        drop(messages);
        self.appended.notify_waiters();
        offset
    }

    pub async fn len(&self) -> u64 {
        self.messages.read().await.len() as u64
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    pub async fn messages(&self) -> Vec<Vec<u8>> {
        self.messages.read().await.clone()
    }
}

pub struct InMemoryLogPublisher {
    log: Arc<InMemoryLog>,
    timeout: Duration,
    started: RwLock<bool>,
    is_offline: bool,
}

impl InMemoryLogPublisher {
    pub fn new(log: Arc<InMemoryLog>, timeout: Duration) -> Self {
        Self {
            log,
            timeout,
            started: RwLock::new(false),
            is_offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait]
impl EventPublisher for InMemoryLogPublisher {
    async fn start(&self) -> Result<(), PublishError> {
        *self.started.write().await = true;
        Ok(())
    }

    async fn stop(&self) -> Result<(), PublishError> {
        *self.started.write().await = false;
        Ok(())
    }

    async fn publish(&self, envelope: &EventEnvelope) -> Result<(), PublishError> {
        if !*self.started.read().await {
            return Err(PublishError::NotStarted);
        }
        if self.is_offline {
            return Err(PublishError::Transport("log unreachable".to_string()));
        }
        let body =
            serde_json::to_vec(envelope).map_err(|e| PublishError::Transport(e.to_string()))?;
        let offset = tokio::time::timeout(self.timeout, self.log.append(body))
            .await
            .map_err(|_| PublishError::Timeout(self.timeout))?;
        debug!(offset, event_type = %envelope.event_type, "event appended to log");
        Ok(())
    }
}

pub struct InMemoryLogSubscriber {
    log: Arc<InMemoryLog>,
    position: RwLock<Option<u64>>,
    committed: RwLock<Option<u64>>,
}

impl InMemoryLogSubscriber {
    pub fn new(log: Arc<InMemoryLog>) -> Self {
        Self {
            log,
            position: RwLock::new(None),
            committed: RwLock::new(None),
        }
    }

    /// Last committed offset, if any. Observable for tests and diagnostics.
    pub async fn committed(&self) -> Option<u64> {
        *self.committed.read().await
    }
}

#[async_trait]
impl LogSubscriber for InMemoryLogSubscriber {
    async fn connect(&self, start: StartOffset) -> Result<(), SubscribeError> {
        let position = match start {
            StartOffset::Earliest => 0,
            StartOffset::Latest => self.log.len().await,
        };
        *self.position.write().await = Some(position);
        Ok(())
    }

    async fn next_message(&self) -> Result<RawMessage, SubscribeError> {
        loop {
            // Register for the wakeup before checking, so an append between the
            // check and the await cannot be missed.
            let appended = self.log.appended.notified();
            {
                let mut position = self.position.write().await;
                let offset = position.ok_or(SubscribeError::NotConnected)?;
                let messages = self.log.messages.read().await;
                if let Some(body) = messages.get(offset as usize) {
                    *position = Some(offset + 1);
                    return Ok(RawMessage {
                        offset,
                        body: body.clone(),
                    });
                }
            }
            appended.await;
        }
    }

    async fn commit(&self, offset: u64) -> Result<(), SubscribeError> {
        if self.position.read().await.is_none() {
            return Err(SubscribeError::NotConnected);
        }
        *self.committed.write().await = Some(offset);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), SubscribeError> {
        *self.position.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_log_tests {
    use super::*;
    use crate::core::order::Order;
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> (Arc<InMemoryLog>, EventEnvelope) {
        let order = Order::new("o1", "alice", vec!["pizza".to_string()]);
        (InMemoryLog::new(), EventEnvelope::order_created(&order).unwrap())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_preserve_append_order(before_each: (Arc<InMemoryLog>, EventEnvelope)) {
        let (log, _) = before_each;
        assert_eq!(log.append(b"a".to_vec()).await, 0);
        assert_eq!(log.append(b"b".to_vec()).await, 1);
        assert_eq!(log.messages().await, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_to_publish_before_start(
        before_each: (Arc<InMemoryLog>, EventEnvelope),
    ) {
        let (log, envelope) = before_each;
        let publisher = InMemoryLogPublisher::new(log, Duration::from_secs(1));
        assert!(matches!(
            publisher.publish(&envelope).await,
            Err(PublishError::NotStarted)
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_to_publish_after_stop(
        before_each: (Arc<InMemoryLog>, EventEnvelope),
    ) {
        let (log, envelope) = before_each;
        let publisher = InMemoryLogPublisher::new(log.clone(), Duration::from_secs(1));
        publisher.start().await.unwrap();
        publisher.publish(&envelope).await.unwrap();
        publisher.stop().await.unwrap();
        assert!(matches!(
            publisher.publish(&envelope).await,
            Err(PublishError::NotStarted)
        ));
        assert_eq!(log.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_publish_when_the_log_is_unreachable(
        before_each: (Arc<InMemoryLog>, EventEnvelope),
    ) {
        let (log, envelope) = before_each;
        let mut publisher = InMemoryLogPublisher::new(log, Duration::from_secs(1));
        publisher.start().await.unwrap();
        publisher.toggle_offline();
        assert!(matches!(
            publisher.publish(&envelope).await,
            Err(PublishError::Transport(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_deliver_messages_in_order_from_the_earliest_offset(
        before_each: (Arc<InMemoryLog>, EventEnvelope),
    ) {
        let (log, _) = before_each;
        log.append(b"a".to_vec()).await;
        log.append(b"b".to_vec()).await;

        let subscriber = InMemoryLogSubscriber::new(log);
        subscriber.connect(StartOffset::Earliest).await.unwrap();
        let first = subscriber.next_message().await.unwrap();
        let second = subscriber.next_message().await.unwrap();
        assert_eq!((first.offset, first.body), (0, b"a".to_vec()));
        assert_eq!((second.offset, second.body), (1, b"b".to_vec()));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_wake_a_blocked_subscriber_on_append(
        before_each: (Arc<InMemoryLog>, EventEnvelope),
    ) {
        let (log, _) = before_each;
        let subscriber = Arc::new(InMemoryLogSubscriber::new(log.clone()));
        subscriber.connect(StartOffset::Latest).await.unwrap();

        let waiting = subscriber.clone();
        let pending = tokio::spawn(async move { waiting.next_message().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        log.append(b"late".to_vec()).await;

        let message = pending.await.unwrap().unwrap();
        assert_eq!(message.body, b"late".to_vec());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_require_a_connection_before_reading_or_committing(
        before_each: (Arc<InMemoryLog>, EventEnvelope),
    ) {
        let (log, _) = before_each;
        log.append(b"a".to_vec()).await;
        let subscriber = InMemoryLogSubscriber::new(log);
        assert!(matches!(
            subscriber.next_message().await,
            Err(SubscribeError::NotConnected)
        ));
        assert!(matches!(
            subscriber.commit(0).await,
            Err(SubscribeError::NotConnected)
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_track_the_committed_offset(before_each: (Arc<InMemoryLog>, EventEnvelope)) {
        let (log, _) = before_each;
        log.append(b"a".to_vec()).await;
        let subscriber = InMemoryLogSubscriber::new(log);
        subscriber.connect(StartOffset::Earliest).await.unwrap();
        assert_eq!(subscriber.committed().await, None);
        let message = subscriber.next_message().await.unwrap();
        subscriber.commit(message.offset).await.unwrap();
        assert_eq!(subscriber.committed().await, Some(0));
    }
}
