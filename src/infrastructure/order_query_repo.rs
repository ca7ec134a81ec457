use std::cell::RefCell;

use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{DbConn, DbPool, StatementCounter};
use crate::domain::errors::DomainError;
use crate::domain::item::Item;
use crate::domain::member::Member;
use crate::domain::order::{Delivery, OrderSearch};
use crate::query::dto::{OrderFlatRow, OrderItemDto, SimpleOrderDto};
use crate::query::store::{JoinedOrder, OrderItemRecord, OrderQueryStore, OrderRecord, Page};
use crate::schema::{deliveries, items, members, order_items, orders};

use super::models::{
    DeliveryRow, ItemRow, MemberRow, OrderFlatDbRow, OrderHeaderRow, OrderItemRow, OrderLineRow,
    OrderRow,
};

/// Applies the member-name and status filters to a boxed query that has
/// `members` joined in.
macro_rules! apply_search {
    ($query:ident, $search:expr) => {
        if let Some(name) = $search.member_name.as_deref().filter(|n| !n.is_empty()) {
            $query = $query.filter(members::name.like(format!("%{name}%")));
        }
        if let Some(status) = $search.order_status {
            $query = $query.filter(orders::status.eq(status.as_str()));
        }
    };
}

/// Request-scoped [`OrderQueryStore`] over one pooled connection. Every
/// statement sent on that connection is counted.
pub struct DieselOrderQueryStore {
    conn: RefCell<DbConn>,
    counter: StatementCounter,
}

impl DieselOrderQueryStore {
    pub fn new(mut conn: DbConn) -> Self {
        let counter = StatementCounter::default();
        counter.attach(&mut conn);
        Self {
            conn: RefCell::new(conn),
            counter,
        }
    }

    pub fn from_pool(pool: &DbPool) -> Result<Self, DomainError> {
        Ok(Self::new(pool.get()?))
    }
}

impl OrderQueryStore for DieselOrderQueryStore {
    fn find_orders(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<OrderRecord>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();

        let mut query = orders::table
            .inner_join(members::table)
            .select(OrderRow::as_select())
            .order((orders::order_date.asc(), orders::id.asc()))
            .into_boxed();
        apply_search!(query, search);
        if let Some(page) = page {
            query = query.offset(page.offset).limit(page.limit);
        }

        query
            .load::<OrderRow>(conn)?
            .into_iter()
            .map(OrderRecord::try_from)
            .collect()
    }

    fn find_member(&self, id: Uuid) -> Result<Member, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        members::table
            .find(id)
            .select(MemberRow::as_select())
            .first::<MemberRow>(conn)
            .optional()?
            .map(Member::from)
            .ok_or(DomainError::NotFound("Member"))
    }

    fn find_delivery(&self, id: Uuid) -> Result<Delivery, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        deliveries::table
            .find(id)
            .select(DeliveryRow::as_select())
            .first::<DeliveryRow>(conn)
            .optional()?
            .ok_or(DomainError::NotFound("Delivery"))?
            .try_into()
    }

    fn find_item(&self, id: Uuid) -> Result<Item, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        items::table
            .find(id)
            .select(ItemRow::as_select())
            .first::<ItemRow>(conn)
            .optional()?
            .ok_or(DomainError::NotFound("Item"))?
            .try_into()
    }

    fn find_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItemRecord>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        let rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load::<OrderItemRow>(conn)?;
        Ok(rows.into_iter().map(OrderItemRecord::from).collect())
    }

    fn find_orders_joined(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<JoinedOrder>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();

        let mut query = orders::table
            .inner_join(members::table)
            .inner_join(deliveries::table)
            .select((
                OrderRow::as_select(),
                MemberRow::as_select(),
                DeliveryRow::as_select(),
            ))
            .order((orders::order_date.asc(), orders::id.asc()))
            .into_boxed();
        apply_search!(query, search);
        if let Some(page) = page {
            query = query.offset(page.offset).limit(page.limit);
        }

        query
            .load::<(OrderRow, MemberRow, DeliveryRow)>(conn)?
            .into_iter()
            .map(|(order, member, delivery)| {
                Ok(JoinedOrder {
                    order: OrderRecord::try_from(order)?,
                    member: Member::from(member),
                    delivery: Delivery::try_from(delivery)?,
                })
            })
            .collect()
    }

    fn find_orders_with_member_delivery(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<SimpleOrderDto>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();

        let mut query = orders::table
            .inner_join(members::table)
            .inner_join(deliveries::table)
            .select((
                orders::id,
                members::name,
                orders::order_date,
                orders::status,
                deliveries::city,
                deliveries::street,
                deliveries::zipcode,
            ))
            .order((orders::order_date.asc(), orders::id.asc()))
            .into_boxed();
        apply_search!(query, search);
        if let Some(page) = page {
            query = query.offset(page.offset).limit(page.limit);
        }

        query
            .load::<OrderHeaderRow>(conn)?
            .into_iter()
            .map(SimpleOrderDto::try_from)
            .collect()
    }

    fn find_order_items_in(
        &self,
        order_ids: &[Uuid],
    ) -> Result<Vec<OrderItemRecord>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        let rows = order_items::table
            .filter(order_items::order_id.eq_any(order_ids))
            .select(OrderItemRow::as_select())
            .order((order_items::order_id.asc(), order_items::id.asc()))
            .load::<OrderItemRow>(conn)?;
        Ok(rows.into_iter().map(OrderItemRecord::from).collect())
    }

    fn find_items_in(&self, item_ids: &[Uuid]) -> Result<Vec<Item>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        items::table
            .filter(items::id.eq_any(item_ids))
            .select(ItemRow::as_select())
            .load::<ItemRow>(conn)?
            .into_iter()
            .map(Item::try_from)
            .collect()
    }

    fn find_order_lines(&self, order_id: Uuid) -> Result<Vec<OrderItemDto>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        let rows = order_items::table
            .inner_join(items::table)
            .filter(order_items::order_id.eq(order_id))
            .select((
                order_items::order_id,
                items::id,
                items::name,
                order_items::order_price,
                order_items::count,
            ))
            .order(order_items::id.asc())
            .load::<OrderLineRow>(conn)?;
        Ok(rows.into_iter().map(OrderItemDto::from).collect())
    }

    fn find_order_lines_in(&self, order_ids: &[Uuid]) -> Result<Vec<OrderItemDto>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();
        let rows = order_items::table
            .inner_join(items::table)
            .filter(order_items::order_id.eq_any(order_ids))
            .select((
                order_items::order_id,
                items::id,
                items::name,
                order_items::order_price,
                order_items::count,
            ))
            .order((order_items::order_id.asc(), order_items::id.asc()))
            .load::<OrderLineRow>(conn)?;
        Ok(rows.into_iter().map(OrderItemDto::from).collect())
    }

    fn find_flat(&self, search: &OrderSearch) -> Result<Vec<OrderFlatRow>, DomainError> {
        let conn = &mut *self.conn.borrow_mut();

        let mut query = orders::table
            .inner_join(members::table)
            .inner_join(deliveries::table)
            .inner_join(order_items::table.inner_join(items::table))
            .select((
                orders::id,
                members::name,
                orders::order_date,
                orders::status,
                deliveries::city,
                deliveries::street,
                deliveries::zipcode,
                items::id,
                items::name,
                order_items::order_price,
                order_items::count,
            ))
            .order((
                orders::order_date.asc(),
                orders::id.asc(),
                order_items::id.asc(),
            ))
            .into_boxed();
        apply_search!(query, search);

        query
            .load::<OrderFlatDbRow>(conn)?
            .into_iter()
            .map(OrderFlatRow::try_from)
            .collect()
    }

    fn statements_issued(&self) -> usize {
        self.counter.get()
    }
}
