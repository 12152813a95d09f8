use crate::adapters::in_memory::in_memory_log::{
    InMemoryLog, InMemoryLogPublisher, InMemoryLogSubscriber,
};
use crate::adapters::in_memory::in_memory_read_store::InMemoryReadStore;
use crate::adapters::in_memory::in_memory_write_store::InMemoryWriteStore;
use crate::application::command_handlers::create_order::CreateOrderHandler;
use crate::application::consumer::EventConsumer;
use crate::application::query_handlers::order_queries::OrderQueries;
use std::sync::Arc;

/// Fully wired component graph for one process. Built by `shell::bootstrap`;
/// nothing in here is a global.
pub struct AppState {
    pub commands: Arc<CreateOrderHandler<InMemoryWriteStore, InMemoryLogPublisher>>,
    pub queries: Arc<OrderQueries<InMemoryReadStore>>,
    pub publisher: Arc<InMemoryLogPublisher>,
    pub consumer: Arc<EventConsumer<InMemoryLogSubscriber, InMemoryReadStore>>,
    pub log: Arc<InMemoryLog>,
    pub write_store: Arc<InMemoryWriteStore>,
    pub read_store: Arc<InMemoryReadStore>,
}
