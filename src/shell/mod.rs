// Composition root for the order pipeline.
//
// Responsibilities
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers, passing references down
//   explicitly instead of relying on import-time singletons.
// - Start and stop the publisher and the consumer loop.

pub mod state;

use crate::adapters::in_memory::in_memory_log::{
    InMemoryLog, InMemoryLogPublisher, InMemoryLogSubscriber,
};
use crate::adapters::in_memory::in_memory_read_store::InMemoryReadStore;
use crate::adapters::in_memory::in_memory_write_store::InMemoryWriteStore;
use crate::application::command_handlers::create_order::CreateOrderHandler;
use crate::application::consumer::EventConsumer;
use crate::application::projector::Projector;
use crate::application::query_handlers::order_queries::OrderQueries;
use crate::config::Config;
use crate::core::ports::EventPublisher;
use crate::shell::state::AppState;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Builds the full component graph and starts the publisher and consumer.
pub async fn bootstrap(config: &Config) -> anyhow::Result<AppState> {
    info!(
        broker_addr = %config.broker_addr,
        topic = %config.topic,
        start_offset = ?config.start_offset,
        "bootstrapping order pipeline"
    );

    let log = InMemoryLog::new();
    let write_store = Arc::new(InMemoryWriteStore::new());
    let read_store = Arc::new(InMemoryReadStore::new());

    let publisher = Arc::new(InMemoryLogPublisher::new(
        log.clone(),
        config.publish_timeout,
    ));
    publisher.start().await.context("starting publisher")?;

    let subscriber = Arc::new(InMemoryLogSubscriber::new(log.clone()));
    let projector = Arc::new(Projector::new(read_store.clone()));
    let consumer = Arc::new(EventConsumer::new(
        subscriber,
        projector,
        config.start_offset,
    ));
    consumer.start().await.context("starting consumer")?;

    let commands = Arc::new(CreateOrderHandler::new(
        write_store.clone(),
        publisher.clone(),
    ));
    let queries = Arc::new(OrderQueries::new(read_store.clone()));

    Ok(AppState {
        commands,
        queries,
        publisher,
        consumer,
        log,
        write_store,
        read_store,
    })
}

/// Cooperative shutdown: the consumer finishes its current message, then both
/// halves release their log connections.
pub async fn shutdown(state: &AppState) -> anyhow::Result<()> {
    state.consumer.stop().await.context("stopping consumer")?;
    state.publisher.stop().await.context("stopping publisher")?;
    info!("order pipeline stopped");
    Ok(())
}
