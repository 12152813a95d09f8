// Projector: folds one event into the read store.
//
// Purpose
// - Pure dispatch on the event kind. ORDER_CREATED upserts the payload keyed
//   by id; unrecognized kinds are a no-op so old builds survive new events.
//
// Idempotence
// - The upsert is a total overwrite-by-id, so applying the same event twice
//   leaves the store in the same state as applying it once.

use crate::core::event::OrderEvent;
use crate::core::ports::{OrderReadStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Projector<TReadStore>
where
    TReadStore: OrderReadStore + 'static,
{
    read_store: Arc<TReadStore>,
}

impl<TReadStore> Projector<TReadStore>
where
    TReadStore: OrderReadStore + 'static,
{
    pub fn new(read_store: Arc<TReadStore>) -> Self {
        Self { read_store }
    }

    pub async fn apply(&self, event: &OrderEvent) -> Result<(), StoreError> {
        match event {
            OrderEvent::OrderCreated(order) => {
                self.read_store.upsert(order.clone()).await?;
                info!(order_id = %order.id, "projected order into read model");
            }
            OrderEvent::Unknown { event_type } => {
                debug!(%event_type, "ignoring unrecognized event type");
            }
        }
        Ok(())
    }
}
