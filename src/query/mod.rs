//! Read side of the order aggregate: the same order list materialized with
//! different query shapes.

pub mod batch;
pub mod dto;
pub mod grouping;
#[cfg(test)]
pub(crate) mod memory;
pub mod service;
pub mod store;
pub mod strategy;

pub use batch::BatchLoader;
pub use dto::{OrderDto, OrderItemDto, Projection, SimpleOrderDto};
pub use service::OrderQueryService;
pub use store::{OrderQueryStore, Page};
pub use strategy::{SimpleStrategy, Strategy};
