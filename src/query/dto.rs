use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::item::Item;
use crate::domain::member::{Address, Member};
use crate::domain::order::{Delivery, OrderStatus};

/// Order with its to-one associations flattened in. This is also the row
/// shape of the root query when member and delivery are joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleOrderDto {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    #[serde(skip)]
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub unit_price: i32,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
    pub items: Vec<OrderItemDto>,
}

impl OrderDto {
    pub fn new(header: SimpleOrderDto, items: Vec<OrderItemDto>) -> Self {
        Self {
            order_id: header.order_id,
            member_name: header.member_name,
            order_date: header.order_date,
            status: header.status,
            address: header.address,
            items,
        }
    }
}

/// One row per order line with every association joined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFlatRow {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub address: Address,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_price: i32,
    pub count: i32,
}

impl OrderFlatRow {
    pub fn header(&self) -> SimpleOrderDto {
        SimpleOrderDto {
            order_id: self.order_id,
            member_name: self.member_name.clone(),
            order_date: self.order_date,
            status: self.status,
            address: self.address.clone(),
        }
    }

    pub fn line(&self) -> OrderItemDto {
        OrderItemDto {
            order_id: self.order_id,
            item_id: self.item_id,
            item_name: self.item_name.clone(),
            unit_price: self.item_price,
            count: self.count,
        }
    }
}

// ── Entity graph (what the naive walk materializes) ─────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberGraph {
    pub id: Uuid,
    pub name: String,
    pub address: Address,
}

impl From<Member> for MemberGraph {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemGraph {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
}

impl From<Item> for ItemGraph {
    fn from(i: Item) -> Self {
        Self {
            id: i.id,
            name: i.name,
            price: i.price,
            stock_quantity: i.stock_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemGraph {
    pub id: Uuid,
    pub item: ItemGraph,
    pub order_price: i32,
    pub count: i32,
    pub total_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderGraph {
    pub id: Uuid,
    pub member: MemberGraph,
    pub delivery: Delivery,
    pub order_items: Vec<OrderItemGraph>,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub total_price: i64,
}

impl From<&OrderGraph> for OrderDto {
    fn from(g: &OrderGraph) -> Self {
        Self {
            order_id: g.id,
            member_name: g.member.name.clone(),
            order_date: g.order_date,
            status: g.status,
            address: g.delivery.address.clone(),
            items: g
                .order_items
                .iter()
                .map(|oi| OrderItemDto {
                    order_id: g.id,
                    item_id: oi.item.id,
                    item_name: oi.item.name.clone(),
                    unit_price: oi.order_price,
                    count: oi.count,
                })
                .collect(),
        }
    }
}

/// Result of a projection call. Serializes as a bare JSON array either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Projection {
    Graph(Vec<OrderGraph>),
    Orders(Vec<OrderDto>),
}

impl Projection {
    pub fn len(&self) -> usize {
        match self {
            Projection::Graph(v) => v.len(),
            Projection::Orders(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (order id, item id, count) for every line, in output order.
    pub fn line_triples(&self) -> Vec<(Uuid, Uuid, i32)> {
        match self {
            Projection::Graph(v) => v
                .iter()
                .flat_map(|o| o.order_items.iter().map(move |oi| (o.id, oi.item.id, oi.count)))
                .collect(),
            Projection::Orders(v) => v
                .iter()
                .flat_map(|o| o.items.iter().map(move |i| (o.order_id, i.item_id, i.count)))
                .collect(),
        }
    }
}
