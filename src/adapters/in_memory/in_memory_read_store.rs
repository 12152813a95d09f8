// In memory implementation of the read-side projection store.
//
// Purpose
// - Exercise the projector and query handler without a database.
//
// Responsibilities
// - Store denormalized snapshots keyed by id. Upsert is a total overwrite, so
//   re-applying an event leaves the store unchanged.

use crate::core::order::Order;
use crate::core::ports::{OrderReadStore, StoreError};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryReadStore {
    orders: RwLock<HashMap<String, Order>>,
    is_offline: bool,
}

impl InMemoryReadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait::async_trait]
impl OrderReadStore for InMemoryReadStore {
    async fn upsert(&self, order: Order) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("read store offline".to_string()));
        }
        self.orders.write().await.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Order>, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("read store offline".to_string()));
        }
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("read store offline".to_string()));
        }
        Ok(self.orders.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod in_memory_read_store_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_upsert_and_list_snapshots() {
        let store = InMemoryReadStore::new();
        store
            .upsert(Order::new("o1", "alice", vec![]))
            .await
            .unwrap();
        store.upsert(Order::new("o2", "bob", vec![])).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_duplicate_entries_on_repeated_upsert() {
        let store = InMemoryReadStore::new();
        let order = Order::new("o1", "alice", vec!["pizza".to_string()]);
        store.upsert(order.clone()).await.unwrap();
        store.upsert(order).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_when_offline() {
        let mut store = InMemoryReadStore::new();
        store.toggle_offline();
        assert!(store.list_all().await.is_err());
        assert!(store.get_by_id("o1").await.is_err());
    }
}
