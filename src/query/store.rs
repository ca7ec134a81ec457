use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::item::Item;
use crate::domain::member::Member;
use crate::domain::order::{Delivery, OrderSearch, OrderStatus};

use super::dto::{OrderFlatRow, OrderItemDto, SimpleOrderDto};

/// Offset/limit window over the root order set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const MAX_LIMIT: i64 = 1000;

    pub fn new(offset: i64, limit: i64) -> Result<Self, DomainError> {
        if offset < 0 {
            return Err(DomainError::InvalidInput("offset must not be negative".into()));
        }
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(DomainError::InvalidInput(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self { offset, limit })
    }

    /// Applies the window to an already materialized list.
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

/// Root order row without any association resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: Uuid,
    pub member_id: Uuid,
    pub delivery_id: Uuid,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

/// Root order with its to-one entities loaded by the same join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedOrder {
    pub order: OrderRecord,
    pub member: Member,
    pub delivery: Delivery,
}

/// Order line row without its item resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub order_price: i32,
    pub count: i32,
}

/// Read-side access to the order graph. Every method issues exactly one
/// statement, so a strategy's cost is the number of calls it makes.
///
/// Rows are returned ordered by order date, then order id; order lines keep
/// a stable order within their order.
pub trait OrderQueryStore {
    fn find_orders(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<OrderRecord>, DomainError>;
    fn find_member(&self, id: Uuid) -> Result<Member, DomainError>;
    fn find_delivery(&self, id: Uuid) -> Result<Delivery, DomainError>;
    fn find_item(&self, id: Uuid) -> Result<Item, DomainError>;
    fn find_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItemRecord>, DomainError>;

    /// Orders joined with the full member and delivery rows. The page is
    /// applied in SQL.
    fn find_orders_joined(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<JoinedOrder>, DomainError>;
    /// Orders joined with member and delivery, selecting only the DTO
    /// columns. The page is applied in SQL.
    fn find_orders_with_member_delivery(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<SimpleOrderDto>, DomainError>;
    fn find_order_items_in(&self, order_ids: &[Uuid])
        -> Result<Vec<OrderItemRecord>, DomainError>;
    fn find_items_in(&self, item_ids: &[Uuid]) -> Result<Vec<Item>, DomainError>;

    /// Order lines of one order joined with their items.
    fn find_order_lines(&self, order_id: Uuid) -> Result<Vec<OrderItemDto>, DomainError>;
    /// Order lines of every listed order joined with their items.
    fn find_order_lines_in(&self, order_ids: &[Uuid]) -> Result<Vec<OrderItemDto>, DomainError>;

    /// Orders joined with every association, one row per order line.
    fn find_flat(&self, search: &OrderSearch) -> Result<Vec<OrderFlatRow>, DomainError>;

    /// Statements issued through this store so far.
    fn statements_issued(&self) -> usize;
}
