// Consumer loop: pulls raw messages from the log and routes them to the projector.
//
// Lifecycle
// - STOPPED -> STARTING -> RUNNING -> STOPPING -> STOPPED. `stop` is idempotent
//   and cooperative: the current message finishes, then the loop exits and the
//   subscription is released.
//
// Message handling
// - Empty body: heartbeat/tombstone, skipped silently.
// - Undecodable body: warn and skip. A single poisoned message never halts the loop.
// - Envelope that fails typed-event construction: error and skip.
// - Projector failure: retried a bounded number of times, then the event is
//   dropped with an error log so consumption continues.
// - The offset is committed only after the message has been fully handled.

use crate::application::projector::Projector;
use crate::core::event::{EventEnvelope, OrderEvent};
use crate::core::ports::{LogSubscriber, OrderReadStore, RawMessage, StartOffset, SubscribeError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace, warn};

const MAX_PROJECTION_ATTEMPTS: u32 = 3;
const PROJECTION_RETRY_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error("consumer is not stopped")]
    AlreadyRunning,

    #[error(transparent)]
    Subscribe(#[from] SubscribeError),
}

pub struct EventConsumer<TSubscriber, TReadStore>
where
    TSubscriber: LogSubscriber + 'static,
    TReadStore: OrderReadStore + 'static,
{
    subscriber: Arc<TSubscriber>,
    projector: Arc<Projector<TReadStore>>,
    start_offset: StartOffset,
    state: Arc<RwLock<ConsumerState>>,
    shutdown: RwLock<CancellationToken>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl<TSubscriber, TReadStore> EventConsumer<TSubscriber, TReadStore>
where
    TSubscriber: LogSubscriber + 'static,
    TReadStore: OrderReadStore + 'static,
{
    pub fn new(
        subscriber: Arc<TSubscriber>,
        projector: Arc<Projector<TReadStore>>,
        start_offset: StartOffset,
    ) -> Self {
        Self {
            subscriber,
            projector,
            start_offset,
            state: Arc::new(RwLock::new(ConsumerState::Stopped)),
            shutdown: RwLock::new(CancellationToken::new()),
            join: Mutex::new(None),
        }
    }

    pub async fn state(&self) -> ConsumerState {
        *self.state.read().await
    }

    pub async fn start(&self) -> Result<(), ConsumeError> {
        {
            let mut state = self.state.write().await;
            if *state != ConsumerState::Stopped {
                return Err(ConsumeError::AlreadyRunning);
            }
            *state = ConsumerState::Starting;
        }

        if let Err(err) = self.subscriber.connect(self.start_offset).await {
            *self.state.write().await = ConsumerState::Stopped;
            return Err(err.into());
        }

        let token = CancellationToken::new();
        *self.shutdown.write().await = token.clone();

        let subscriber = self.subscriber.clone();
        let projector = self.projector.clone();
        let handle = tokio::spawn(async move {
            consume_loop(subscriber, projector, token).await;
        });
        *self.join.lock().await = Some(handle);
        *self.state.write().await = ConsumerState::Running;
        info!(start_offset = ?self.start_offset, "consumer running");
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), ConsumeError> {
        {
            let mut state = self.state.write().await;
            if *state == ConsumerState::Stopped {
                return Ok(());
            }
            *state = ConsumerState::Stopping;
        }

        self.shutdown.read().await.cancel();
        if let Some(handle) = self.join.lock().await.take() {
            let _ = handle.await;
        }
        self.subscriber.disconnect().await?;
        *self.state.write().await = ConsumerState::Stopped;
        info!("consumer stopped");
        Ok(())
    }
}

async fn consume_loop<TSubscriber, TReadStore>(
    subscriber: Arc<TSubscriber>,
    projector: Arc<Projector<TReadStore>>,
    shutdown: CancellationToken,
) where
    TSubscriber: LogSubscriber + 'static,
    TReadStore: OrderReadStore + 'static,
{
    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = subscriber.next_message() => match next {
                Ok(message) => message,
                Err(err) => {
                    error!(error = %err, "subscription lost, consumer loop exiting");
                    break;
                }
            },
        };
        handle_message(subscriber.as_ref(), &projector, message).await;
    }
}

async fn handle_message<TSubscriber, TReadStore>(
    subscriber: &TSubscriber,
    projector: &Projector<TReadStore>,
    message: RawMessage,
) where
    TSubscriber: LogSubscriber + 'static,
    TReadStore: OrderReadStore + 'static,
{
    let offset = message.offset;

    if message.body.is_empty() {
        trace!(offset, "skipping empty message body");
    } else {
        match serde_json::from_slice::<EventEnvelope>(&message.body) {
            Err(err) => {
                warn!(offset, error = %err, "skipping undecodable message");
            }
            Ok(envelope) => match OrderEvent::try_from(envelope) {
                Err(err) => {
                    error!(offset, error = %err, "skipping malformed event");
                }
                Ok(event) => project_with_retry(projector, offset, &event).await,
            },
        }
    }

    if let Err(err) = subscriber.commit(offset).await {
        warn!(offset, error = %err, "failed to commit offset");
    }
}

async fn project_with_retry<TReadStore>(
    projector: &Projector<TReadStore>,
    offset: u64,
    event: &OrderEvent,
) where
    TReadStore: OrderReadStore + 'static,
{
    for attempt in 1..=MAX_PROJECTION_ATTEMPTS {
        match projector.apply(event).await {
            Ok(()) => return,
            Err(err) if attempt == MAX_PROJECTION_ATTEMPTS => {
                error!(
                    offset,
                    attempt,
                    error = %err,
                    "dropping event after repeated projection failures"
                );
            }
            Err(err) => {
                warn!(offset, attempt, error = %err, "projection failed, retrying");
                tokio::time::sleep(PROJECTION_RETRY_DELAY).await;
            }
        }
    }
}
