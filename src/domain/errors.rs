use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: Uuid,
        requested: i32,
        available: i32,
    },
    #[error("Order is already cancelled")]
    AlreadyCancelled,
    #[error("Order has already been delivered and cannot be cancelled")]
    AlreadyDelivered,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
