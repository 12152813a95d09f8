// In memory implementation of the write-side store.
//
// Purpose
// - Support command handler tests and local development without a database.
//
// Responsibilities
// - Store the authoritative order snapshots in a map keyed by id, with
//   overwrite-by-id save semantics.

use crate::core::order::Order;
use crate::core::ports::{OrderWriteStore, StoreError};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryWriteStore {
    orders: RwLock<HashMap<String, Order>>,
    is_offline: bool,
}

impl InMemoryWriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait::async_trait]
impl OrderWriteStore for InMemoryWriteStore {
    async fn save(&self, order: Order) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("write store offline".to_string()));
        }
        self.orders.write().await.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Order>, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("write store offline".to_string()));
        }
        Ok(self.orders.read().await.get(id).cloned())
    }
}
