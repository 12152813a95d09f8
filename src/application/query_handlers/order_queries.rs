// Query handler: the read surface over the projection store.
//
// Purpose
// - Serve get-by-id and list-all straight from the read store. Side-effect
//   free, never touches the write store.
//
// Boundaries
// - Results reflect however far behind the consumer loop currently is; no
//   freshness guarantee is made here.
// - "Not found" is a normal empty result, not an error.

use crate::core::order::Order;
use crate::core::ports::{OrderReadStore, StoreError};
use std::sync::Arc;

pub struct OrderQueries<TReadStore>
where
    TReadStore: OrderReadStore + 'static,
{
    read_store: Arc<TReadStore>,
}

impl<TReadStore> OrderQueries<TReadStore>
where
    TReadStore: OrderReadStore + 'static,
{
    pub fn new(read_store: Arc<TReadStore>) -> Self {
        Self { read_store }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Order>, StoreError> {
        self.read_store.get_by_id(id).await
    }

    /// All snapshots, in unspecified order.
    pub async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        self.read_store.list_all().await
    }
}
