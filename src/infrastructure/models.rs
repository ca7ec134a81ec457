use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::item::{Item, ItemKind};
use crate::domain::member::{Address, Member};
use crate::domain::order::{Delivery, OrderItem};
use crate::query::dto::{OrderFlatRow, OrderItemDto, SimpleOrderDto};
use crate::query::store::{OrderItemRecord, OrderRecord};
use crate::schema::{categories, category_items, deliveries, items, members, order_items, orders};

/// Parses a stored enum column. Unknown values are invariant violations.
fn stored<T>(value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|e: DomainError| DomainError::InvariantViolation(e.to_string()))
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MemberRow {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl From<MemberRow> for Member {
    fn from(r: MemberRow) -> Self {
        Member {
            id: r.id,
            name: r.name,
            address: Address::new(r.city, r.street, r.zipcode),
        }
    }
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        MemberRow {
            id: m.id,
            name: m.name.clone(),
            city: m.address.city.clone(),
            street: m.address.street.clone(),
            zipcode: m.address.zipcode.clone(),
        }
    }
}

/// Single-table row for every item kind; `dtype` says which optional columns
/// are populated.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ItemRow {
    pub id: Uuid,
    pub dtype: String,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub artist: Option<String>,
    pub etc: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
}

impl TryFrom<ItemRow> for Item {
    type Error = DomainError;

    fn try_from(r: ItemRow) -> Result<Self, Self::Error> {
        fn required(value: Option<String>, column: &str, id: Uuid) -> Result<String, DomainError> {
            value.ok_or_else(|| {
                DomainError::InvariantViolation(format!("item {id} has no {column}"))
            })
        }

        let kind = match r.dtype.as_str() {
            "B" => ItemKind::Book {
                author: required(r.author, "author", r.id)?,
                isbn: required(r.isbn, "isbn", r.id)?,
            },
            "A" => ItemKind::Album {
                artist: required(r.artist, "artist", r.id)?,
                etc: required(r.etc, "etc", r.id)?,
            },
            "M" => ItemKind::Movie {
                director: required(r.director, "director", r.id)?,
                actor: required(r.actor, "actor", r.id)?,
            },
            other => {
                return Err(DomainError::InvariantViolation(format!(
                    "item {} has unknown dtype '{other}'",
                    r.id
                )))
            }
        };
        Ok(Item {
            id: r.id,
            name: r.name,
            price: r.price,
            stock_quantity: r.stock_quantity,
            kind,
        })
    }
}

impl From<&Item> for ItemRow {
    fn from(i: &Item) -> Self {
        let mut row = ItemRow {
            id: i.id,
            dtype: i.kind.discriminator().to_string(),
            name: i.name.clone(),
            price: i.price,
            stock_quantity: i.stock_quantity,
            author: None,
            isbn: None,
            artist: None,
            etc: None,
            director: None,
            actor: None,
        };
        match &i.kind {
            ItemKind::Book { author, isbn } => {
                row.author = Some(author.clone());
                row.isbn = Some(isbn.clone());
            }
            ItemKind::Album { artist, etc } => {
                row.artist = Some(artist.clone());
                row.etc = Some(etc.clone());
            }
            ItemKind::Movie { director, actor } => {
                row.director = Some(director.clone());
                row.actor = Some(actor.clone());
            }
        }
        row
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryRow {
    pub id: Uuid,
    pub city: String,
    pub street: String,
    pub zipcode: String,
    pub status: String,
}

impl TryFrom<DeliveryRow> for Delivery {
    type Error = DomainError;

    fn try_from(r: DeliveryRow) -> Result<Self, Self::Error> {
        Ok(Delivery {
            id: r.id,
            address: Address::new(r.city, r.street, r.zipcode),
            status: stored(&r.status)?,
        })
    }
}

impl From<&Delivery> for DeliveryRow {
    fn from(d: &Delivery) -> Self {
        DeliveryRow {
            id: d.id,
            city: d.address.city.clone(),
            street: d.address.street.clone(),
            zipcode: d.address.zipcode.clone(),
            status: d.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub delivery_id: Uuid,
    pub status: String,
    pub order_date: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = DomainError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        Ok(OrderRecord {
            id: r.id,
            member_id: r.member_id,
            delivery_id: r.delivery_id,
            status: stored(&r.status)?,
            order_date: r.order_date,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub order_price: i32,
    pub count: i32,
}

impl OrderItemRow {
    pub fn new(order_id: Uuid, oi: &OrderItem) -> Self {
        OrderItemRow {
            id: oi.id,
            order_id,
            item_id: oi.item_id,
            order_price: oi.order_price,
            count: oi.count,
        }
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        OrderItem {
            id: r.id,
            item_id: r.item_id,
            order_price: r.order_price,
            count: r.count,
        }
    }
}

impl From<OrderItemRow> for OrderItemRecord {
    fn from(r: OrderItemRow) -> Self {
        OrderItemRecord {
            id: r.id,
            order_id: r.order_id,
            item_id: r.item_id,
            order_price: r.order_price,
            count: r.count,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            name: r.name,
            parent_id: r.parent_id,
        }
    }
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        CategoryRow {
            id: c.id,
            name: c.name.clone(),
            parent_id: c.parent_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = category_items)]
pub struct CategoryItemRow {
    pub category_id: Uuid,
    pub item_id: Uuid,
}

// ── Projection rows ──────────────────────────────────────────────────────────

/// orders ⋈ members ⋈ deliveries
#[derive(Debug, Queryable)]
pub struct OrderHeaderRow {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl TryFrom<OrderHeaderRow> for SimpleOrderDto {
    type Error = DomainError;

    fn try_from(r: OrderHeaderRow) -> Result<Self, Self::Error> {
        Ok(SimpleOrderDto {
            order_id: r.order_id,
            member_name: r.member_name,
            order_date: r.order_date,
            status: stored(&r.status)?,
            address: Address::new(r.city, r.street, r.zipcode),
        })
    }
}

/// order_items ⋈ items
#[derive(Debug, Queryable)]
pub struct OrderLineRow {
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub order_price: i32,
    pub count: i32,
}

impl From<OrderLineRow> for OrderItemDto {
    fn from(r: OrderLineRow) -> Self {
        OrderItemDto {
            order_id: r.order_id,
            item_id: r.item_id,
            item_name: r.item_name,
            unit_price: r.order_price,
            count: r.count,
        }
    }
}

/// orders ⋈ members ⋈ deliveries ⋈ order_items ⋈ items
#[derive(Debug, Queryable)]
pub struct OrderFlatDbRow {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
    pub item_id: Uuid,
    pub item_name: String,
    pub order_price: i32,
    pub count: i32,
}

impl TryFrom<OrderFlatDbRow> for OrderFlatRow {
    type Error = DomainError;

    fn try_from(r: OrderFlatDbRow) -> Result<Self, Self::Error> {
        Ok(OrderFlatRow {
            order_id: r.order_id,
            member_name: r.member_name,
            order_date: r.order_date,
            status: stored(&r.status)?,
            address: Address::new(r.city, r.street, r.zipcode),
            item_id: r.item_id,
            item_name: r.item_name,
            item_price: r.order_price,
            count: r.count,
        })
    }
}
