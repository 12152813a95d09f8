// Demo binary: wires the pipeline and runs one command -> event -> query cycle.
//
// The request layer that would normally drive the handlers is out of scope;
// this binary stands in for it so the wiring can be exercised end to end.

use orders::application::command_handlers::create_order::CreateOrder;
use orders::config::Config;
use orders::shell;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    shell::init_tracing();

    let config = Config::from_env()?;
    let app = shell::bootstrap(&config).await?;

    let id = Uuid::now_v7().to_string();
    app.commands
        .handle(CreateOrder {
            id: id.clone(),
            customer: "alice".to_string(),
            items: vec!["pizza".to_string(), "soda".to_string()],
        })
        .await?;

    // The read model converges asynchronously; poll until the consumer
    // catches up.
    let mut snapshot = None;
    for _ in 0..100 {
        snapshot = app.queries.get_by_id(&id).await?;
        if snapshot.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    match snapshot {
        Some(order) => info!(?order, "read model caught up"),
        None => info!(order_id = %id, "read model did not catch up in time"),
    }

    shell::shutdown(&app).await
}
