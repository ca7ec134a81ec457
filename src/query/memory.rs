//! In-memory [`OrderQueryStore`] for exercising the strategies without a
//! database. Each trait call counts as one statement.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::item::{Item, ItemKind};
use crate::domain::member::{Address, Member};
use crate::domain::order::{Delivery, DeliveryStatus, OrderSearch, OrderStatus};

use super::dto::{OrderFlatRow, OrderItemDto, SimpleOrderDto};
use super::store::{JoinedOrder, OrderItemRecord, OrderQueryStore, OrderRecord, Page};

#[derive(Default)]
pub struct InMemoryOrderStore {
    members: HashMap<Uuid, Member>,
    deliveries: HashMap<Uuid, Delivery>,
    items: HashMap<Uuid, Item>,
    orders: Vec<OrderRecord>,
    order_items: Vec<OrderItemRecord>,
    statements: Cell<usize>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, name: &str) -> Uuid {
        let member = Member {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: Address::new("Seoul", name, "12345"),
        };
        let id = member.id;
        self.members.insert(id, member);
        id
    }

    pub fn add_item(&mut self, name: &str, price: i32, stock_quantity: i32) -> Uuid {
        let item = Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            stock_quantity,
            kind: ItemKind::Book {
                author: "author".to_string(),
                isbn: "isbn".to_string(),
            },
        };
        let id = item.id;
        self.items.insert(id, item);
        id
    }

    /// Adds an order dated one minute after the previous one.
    pub fn add_order(&mut self, member_id: Uuid, lines: &[(Uuid, i32)]) -> Uuid {
        let address = self.members[&member_id].address.clone();
        let delivery = Delivery {
            id: Uuid::new_v4(),
            address,
            status: DeliveryStatus::Ready,
        };
        let order = OrderRecord {
            id: Uuid::new_v4(),
            member_id,
            delivery_id: delivery.id,
            status: OrderStatus::Ordered,
            order_date: base_date() + Duration::minutes(self.orders.len() as i64),
        };
        for &(item_id, count) in lines {
            self.order_items.push(OrderItemRecord {
                id: Uuid::new_v4(),
                order_id: order.id,
                item_id,
                order_price: self.items[&item_id].price,
                count,
            });
        }
        let id = order.id;
        self.deliveries.insert(delivery.id, delivery);
        self.orders.push(order);
        id
    }

    pub fn cancel(&mut self, order_id: Uuid) {
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == order_id) {
            order.status = OrderStatus::Cancelled;
        }
    }

    /// Drops every item so lookups by id come back empty.
    pub fn forget_items(&mut self) {
        self.items.clear();
    }

    fn issue(&self) {
        self.statements.set(self.statements.get() + 1);
    }

    fn matching(&self, search: &OrderSearch) -> Vec<&OrderRecord> {
        self.orders
            .iter()
            .filter(|o| search.matches(&self.members[&o.member_id].name, o.status))
            .collect()
    }

    fn paged<'a>(&'a self, search: &OrderSearch, page: Option<Page>) -> Vec<&'a OrderRecord> {
        let rows = self.matching(search);
        match page {
            Some(page) => page.slice(rows),
            None => rows,
        }
    }

    fn header(&self, o: &OrderRecord) -> SimpleOrderDto {
        SimpleOrderDto {
            order_id: o.id,
            member_name: self.members[&o.member_id].name.clone(),
            order_date: o.order_date,
            status: o.status,
            address: self.deliveries[&o.delivery_id].address.clone(),
        }
    }

    fn line(&self, oi: &OrderItemRecord) -> OrderItemDto {
        OrderItemDto {
            order_id: oi.order_id,
            item_id: oi.item_id,
            item_name: self.items[&oi.item_id].name.clone(),
            unit_price: oi.order_price,
            count: oi.count,
        }
    }
}

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

impl OrderQueryStore for InMemoryOrderStore {
    fn find_orders(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<OrderRecord>, DomainError> {
        self.issue();
        Ok(self.paged(search, page).into_iter().cloned().collect())
    }

    fn find_member(&self, id: Uuid) -> Result<Member, DomainError> {
        self.issue();
        self.members
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound("Member"))
    }

    fn find_delivery(&self, id: Uuid) -> Result<Delivery, DomainError> {
        self.issue();
        self.deliveries
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound("Delivery"))
    }

    fn find_item(&self, id: Uuid) -> Result<Item, DomainError> {
        self.issue();
        self.items
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound("Item"))
    }

    fn find_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItemRecord>, DomainError> {
        self.issue();
        Ok(self
            .order_items
            .iter()
            .filter(|oi| oi.order_id == order_id)
            .cloned()
            .collect())
    }

    fn find_orders_joined(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<JoinedOrder>, DomainError> {
        self.issue();
        Ok(self
            .paged(search, page)
            .into_iter()
            .map(|o| JoinedOrder {
                order: o.clone(),
                member: self.members[&o.member_id].clone(),
                delivery: self.deliveries[&o.delivery_id].clone(),
            })
            .collect())
    }

    fn find_orders_with_member_delivery(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<SimpleOrderDto>, DomainError> {
        self.issue();
        Ok(self
            .paged(search, page)
            .into_iter()
            .map(|o| self.header(o))
            .collect())
    }

    fn find_order_items_in(
        &self,
        order_ids: &[Uuid],
    ) -> Result<Vec<OrderItemRecord>, DomainError> {
        self.issue();
        Ok(self
            .order_items
            .iter()
            .filter(|oi| order_ids.contains(&oi.order_id))
            .cloned()
            .collect())
    }

    fn find_items_in(&self, item_ids: &[Uuid]) -> Result<Vec<Item>, DomainError> {
        self.issue();
        Ok(item_ids
            .iter()
            .filter_map(|id| self.items.get(id).cloned())
            .collect())
    }

    fn find_order_lines(&self, order_id: Uuid) -> Result<Vec<OrderItemDto>, DomainError> {
        self.issue();
        Ok(self
            .order_items
            .iter()
            .filter(|oi| oi.order_id == order_id)
            .map(|oi| self.line(oi))
            .collect())
    }

    fn find_order_lines_in(&self, order_ids: &[Uuid]) -> Result<Vec<OrderItemDto>, DomainError> {
        self.issue();
        Ok(self
            .order_items
            .iter()
            .filter(|oi| order_ids.contains(&oi.order_id))
            .map(|oi| self.line(oi))
            .collect())
    }

    fn find_flat(&self, search: &OrderSearch) -> Result<Vec<OrderFlatRow>, DomainError> {
        self.issue();
        let mut rows = Vec::new();
        for o in self.matching(search) {
            let header = self.header(o);
            for oi in self.order_items.iter().filter(|oi| oi.order_id == o.id) {
                let line = self.line(oi);
                rows.push(OrderFlatRow {
                    order_id: header.order_id,
                    member_name: header.member_name.clone(),
                    order_date: header.order_date,
                    status: header.status,
                    address: header.address.clone(),
                    item_id: line.item_id,
                    item_name: line.item_name,
                    item_price: line.unit_price,
                    count: line.count,
                });
            }
        }
        Ok(rows)
    }

    fn statements_issued(&self) -> usize {
        self.statements.get()
    }
}
