// Command handler for the create-order write intent.
//
// Purpose
// - Validate the command, persist the authoritative entity, publish exactly one
//   ORDER_CREATED event.
//
// Boundaries
// - The id is minted by the caller, never here.
// - The write-store mutation happens before publish and is NOT rolled back when
//   publish fails; the caller sees the error while the source of truth keeps
//   the order. This dual-write window is a known limitation of the design.

use crate::application::errors::ApplicationError;
use crate::core::event::EventEnvelope;
use crate::core::order::Order;
use crate::core::ports::{EventPublisher, OrderWriteStore};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub id: String,
    pub customer: String,
    pub items: Vec<String>,
}

pub struct CreateOrderHandler<TWriteStore, TPublisher>
where
    TWriteStore: OrderWriteStore + 'static,
    TPublisher: EventPublisher + 'static,
{
    write_store: Arc<TWriteStore>,
    publisher: Arc<TPublisher>,
}

impl<TWriteStore, TPublisher> CreateOrderHandler<TWriteStore, TPublisher>
where
    TWriteStore: OrderWriteStore + 'static,
    TPublisher: EventPublisher + 'static,
{
    pub fn new(write_store: Arc<TWriteStore>, publisher: Arc<TPublisher>) -> Self {
        Self {
            write_store,
            publisher,
        }
    }

    pub async fn handle(&self, command: CreateOrder) -> Result<String, ApplicationError> {
        let order = Order::new(command.id, command.customer, command.items);
        order
            .validate()
            .map_err(|e| ApplicationError::Validation(e.to_string()))?;

        if self.write_store.get(&order.id).await?.is_some() {
            return Err(ApplicationError::AlreadyExists { id: order.id });
        }

        let id = order.id.clone();
        self.write_store.save(order.clone()).await?;

        let envelope = EventEnvelope::order_created(&order)
            .map_err(|e| ApplicationError::Unexpected(e.to_string()))?;
        if let Err(err) = self.publisher.publish(&envelope).await {
            warn!(order_id = %id, error = %err, "order persisted but event publish failed");
            return Err(err.into());
        }

        info!(order_id = %id, "order created and event published");
        Ok(id)
    }
}
