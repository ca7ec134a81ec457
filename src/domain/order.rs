use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::item::Item;
use super::member::{Address, Member};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Ordered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDERED" => Ok(OrderStatus::Ordered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::InvalidInput(format!("unknown order status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Ready,
    Comp,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Ready => "READY",
            DeliveryStatus::Comp => "COMP",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(DeliveryStatus::Ready),
            "COMP" => Ok(DeliveryStatus::Comp),
            other => Err(DomainError::InvalidInput(format!(
                "unknown delivery status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Delivery {
    pub id: Uuid,
    pub address: Address,
    pub status: DeliveryStatus,
}

/// One line of an order. `order_price` is the item's price at the time the
/// order was placed and does not follow later price changes.
/// Unit price times count, widened so a line within stock never overflows.
pub fn line_total(order_price: i32, count: i32) -> i64 {
    i64::from(order_price) * i64::from(count)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub item_id: Uuid,
    pub order_price: i32,
    pub count: i32,
}

impl OrderItem {
    /// Snapshots the item's current price and takes `count` units out of its
    /// stock.
    pub fn create(item: &mut Item, count: i32) -> Result<Self, DomainError> {
        if count <= 0 {
            return Err(DomainError::InvalidInput("count must be positive".into()));
        }
        item.remove_stock(count)?;
        Ok(Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            order_price: item.price,
            count,
        })
    }

    pub fn total_price(&self) -> i64 {
        line_total(self.order_price, self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub member_id: Uuid,
    pub delivery: Delivery,
    pub order_items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Builds a new `ORDERED` order shipped to the member's address.
    pub fn place(
        member: &Member,
        order_items: Vec<OrderItem>,
        order_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if order_items.is_empty() {
            return Err(DomainError::InvalidInput(
                "an order needs at least one item".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            member_id: member.id,
            delivery: Delivery {
                id: Uuid::new_v4(),
                address: member.address.clone(),
                status: DeliveryStatus::Ready,
            },
            order_items,
            status: OrderStatus::Ordered,
            order_date,
        })
    }

    /// Moves the order to `CANCELLED`. The caller restores stock for every
    /// line returned by [`Order::restock_lines`].
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.delivery.status == DeliveryStatus::Comp {
            return Err(DomainError::AlreadyDelivered);
        }
        if self.status == OrderStatus::Cancelled {
            return Err(DomainError::AlreadyCancelled);
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    pub fn restock_lines(&self) -> impl Iterator<Item = (Uuid, i32)> + '_ {
        self.order_items.iter().map(|oi| (oi.item_id, oi.count))
    }

    pub fn total_price(&self) -> i64 {
        self.order_items.iter().map(OrderItem::total_price).sum()
    }
}

/// Filter applied to the root order query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSearch {
    pub member_name: Option<String>,
    pub order_status: Option<OrderStatus>,
}

impl OrderSearch {
    pub fn matches(&self, member_name: &str, status: OrderStatus) -> bool {
        let name_ok = match &self.member_name {
            Some(name) if !name.is_empty() => member_name.contains(name.as_str()),
            _ => true,
        };
        let status_ok = self.order_status.map_or(true, |s| s == status);
        name_ok && status_ok
    }
}
