// Order entity: the unit of write-side state and the shape of every projection row.
//
// Purpose
// - One model serves both sides. The write store holds the authoritative copy,
//   the read store holds a denormalized snapshot rebuilt purely from events.
//
// Boundaries
// - No I/O here. Validation rules live with the model so that the command side
//   and the event-decoding side enforce the same ones.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("order id must not be empty")]
    EmptyId,

    #[error("customer must not be empty")]
    EmptyCustomer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub items: Vec<String>,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    pub fn new(id: impl Into<String>, customer: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            items,
            status: OrderStatus::default(),
        }
    }

    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.id.trim().is_empty() {
            return Err(OrderValidationError::EmptyId);
        }
        if self.customer.trim().is_empty() {
            return Err(OrderValidationError::EmptyCustomer);
        }
        Ok(())
    }
}
