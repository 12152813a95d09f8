// Configuration surface, read from the environment.
//
// Variables
// - ORDERS_BROKER_ADDR        log transport address       (default localhost:9092)
// - ORDERS_TOPIC              topic/stream name           (default order_events)
// - ORDERS_START_OFFSET       earliest | latest           (default earliest)
// - ORDERS_PUBLISH_TIMEOUT_MS per-publish timeout         (default 2000)

use crate::core::ports::StartOffset;
use anyhow::Context;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub broker_addr: String,
    pub topic: String,
    pub start_offset: StartOffset,
    pub publish_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            broker_addr: "localhost:9092".to_string(),
            topic: "order_events".to_string(),
            start_offset: StartOffset::Earliest,
            publish_timeout: Duration::from_millis(2000),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let start_offset = match std::env::var("ORDERS_START_OFFSET") {
            Ok(value) => value
                .parse::<StartOffset>()
                .map_err(anyhow::Error::msg)
                .context("ORDERS_START_OFFSET")?,
            Err(_) => defaults.start_offset,
        };

        let publish_timeout = match std::env::var("ORDERS_PUBLISH_TIMEOUT_MS") {
            Ok(value) => Duration::from_millis(
                value
                    .parse::<u64>()
                    .context("ORDERS_PUBLISH_TIMEOUT_MS must be an integer")?,
            ),
            Err(_) => defaults.publish_timeout,
        };

        Ok(Self {
            broker_addr: std::env::var("ORDERS_BROKER_ADDR").unwrap_or(defaults.broker_addr),
            topic: std::env::var("ORDERS_TOPIC").unwrap_or(defaults.topic),
            start_offset,
            publish_timeout,
        })
    }
}
