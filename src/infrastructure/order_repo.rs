use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::item::Item;
use crate::domain::member::Member;
use crate::domain::order::{Delivery, Order, OrderItem, OrderSearch};
use crate::domain::ports::OrderRepository;
use crate::query::store::OrderRecord;
use crate::schema::{deliveries, items, members, order_items, orders};

use super::models::{DeliveryRow, ItemRow, MemberRow, OrderItemRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn write_stock(conn: &mut PgConnection, item: &Item) -> Result<(), DomainError> {
    diesel::update(items::table.find(item.id))
        .set(items::stock_quantity.eq(item.stock_quantity))
        .execute(conn)?;
    Ok(())
}

/// Resolves delivery and lines for already loaded order rows, keeping the
/// rows' order.
fn assemble(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    let delivery_ids: Vec<Uuid> = rows.iter().map(|r| r.delivery_id).collect();
    let mut delivery_by_id: HashMap<Uuid, Delivery> = deliveries::table
        .filter(deliveries::id.eq_any(&delivery_ids))
        .select(DeliveryRow::as_select())
        .load::<DeliveryRow>(conn)?
        .into_iter()
        .map(|r| Delivery::try_from(r).map(|d| (d.id, d)))
        .collect::<Result<_, _>>()?;

    let lines = OrderItemRow::belonging_to(&rows)
        .select(OrderItemRow::as_select())
        .order(order_items::id.asc())
        .load::<OrderItemRow>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(lines)
        .map(|(row, lines)| {
            let record = OrderRecord::try_from(row)?;
            let delivery = delivery_by_id.remove(&record.delivery_id).ok_or_else(|| {
                DomainError::InvariantViolation(format!("order {} has no delivery", record.id))
            })?;
            Ok(Order {
                id: record.id,
                member_id: record.member_id,
                delivery,
                order_items: lines.into_iter().map(OrderItem::from).collect(),
                status: record.status,
                order_date: record.order_date,
            })
        })
        .collect()
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, member_id: Uuid, item_id: Uuid, count: i32) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.build_transaction()
            .serializable()
            .run::<_, DomainError, _>(|conn| {
                let member: Member = members::table
                    .find(member_id)
                    .select(MemberRow::as_select())
                    .first::<MemberRow>(conn)
                    .optional()?
                    .ok_or(DomainError::NotFound("Member"))?
                    .into();

                let mut item = Item::try_from(
                    items::table
                        .find(item_id)
                        .select(ItemRow::as_select())
                        .for_update()
                        .first::<ItemRow>(conn)
                        .optional()?
                        .ok_or(DomainError::NotFound("Item"))?,
                )?;

                let line = OrderItem::create(&mut item, count)?;
                let order = Order::place(&member, vec![line], Utc::now())?;

                write_stock(conn, &item)?;
                diesel::insert_into(deliveries::table)
                    .values(&DeliveryRow::from(&order.delivery))
                    .execute(conn)?;
                diesel::insert_into(orders::table)
                    .values(&OrderRow {
                        id: order.id,
                        member_id: order.member_id,
                        delivery_id: order.delivery.id,
                        status: order.status.as_str().to_string(),
                        order_date: order.order_date,
                    })
                    .execute(conn)?;
                let lines: Vec<OrderItemRow> = order
                    .order_items
                    .iter()
                    .map(|oi| OrderItemRow::new(order.id, oi))
                    .collect();
                diesel::insert_into(order_items::table)
                    .values(&lines)
                    .execute(conn)?;

                Ok(order.id)
            })
    }

    fn cancel(&self, order_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.build_transaction()
            .serializable()
            .run::<_, DomainError, _>(|conn| {
                let row = orders::table
                    .find(order_id)
                    .select(OrderRow::as_select())
                    .for_update()
                    .first::<OrderRow>(conn)
                    .optional()?
                    .ok_or(DomainError::NotFound("Order"))?;
                let mut order = assemble(conn, vec![row])?
                    .pop()
                    .ok_or(DomainError::NotFound("Order"))?;

                order.cancel()?;

                let item_ids: Vec<Uuid> = order.restock_lines().map(|(id, _)| id).collect();
                let mut stock: HashMap<Uuid, Item> = items::table
                    .filter(items::id.eq_any(&item_ids))
                    .select(ItemRow::as_select())
                    .for_update()
                    .load::<ItemRow>(conn)?
                    .into_iter()
                    .map(|r| Item::try_from(r).map(|i| (i.id, i)))
                    .collect::<Result<_, _>>()?;

                for (item_id, count) in order.restock_lines() {
                    let item = stock.get_mut(&item_id).ok_or_else(|| {
                        DomainError::InvariantViolation(format!(
                            "order {} references missing item {item_id}",
                            order.id
                        ))
                    })?;
                    item.add_stock(count);
                }
                for item in stock.values() {
                    write_stock(conn, item)?;
                }

                diesel::update(orders::table.find(order.id))
                    .set(orders::status.eq(order.status.as_str()))
                    .execute(conn)?;
                Ok(())
            })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(assemble(&mut conn, vec![row])?.pop())
    }

    fn find_all(&self, search: &OrderSearch) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table
            .inner_join(members::table)
            .select(OrderRow::as_select())
            .order((orders::order_date.asc(), orders::id.asc()))
            .into_boxed();
        if let Some(name) = search.member_name.as_deref().filter(|n| !n.is_empty()) {
            query = query.filter(members::name.like(format!("%{name}%")));
        }
        if let Some(status) = search.order_status {
            query = query.filter(orders::status.eq(status.as_str()));
        }
        let rows = query.load::<OrderRow>(&mut conn)?;

        assemble(&mut conn, rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::db::DbPool;
    use crate::domain::errors::DomainError;
    use crate::domain::item::{Item, ItemKind};
    use crate::domain::member::{Address, Member};
    use crate::domain::order::{OrderSearch, OrderStatus};
    use crate::domain::ports::{ItemRepository, MemberRepository, OrderRepository};
    use crate::infrastructure::testing::setup_db;
    use crate::infrastructure::{DieselItemRepository, DieselMemberRepository};

    fn seed(pool: &DbPool, member_name: &str, stock: i32) -> (Uuid, Uuid) {
        let member = Member {
            id: Uuid::new_v4(),
            name: member_name.to_string(),
            address: Address::new("Seoul", "Saejeol", "123456"),
        };
        DieselMemberRepository::new(pool.clone())
            .save(&member)
            .expect("member save failed");
        let book = Item {
            id: Uuid::new_v4(),
            name: "X".to_string(),
            price: 2000,
            stock_quantity: stock,
            kind: ItemKind::Book {
                author: "author".to_string(),
                isbn: "181727232".to_string(),
            },
        };
        DieselItemRepository::new(pool.clone())
            .save(&book)
            .expect("item save failed");
        (member.id, book.id)
    }

    fn stock_of(pool: &DbPool, item_id: Uuid) -> i32 {
        DieselItemRepository::new(pool.clone())
            .find_by_id(item_id)
            .expect("find failed")
            .expect("item exists")
            .stock_quantity
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn place_decrements_stock_and_prices_the_order() {
        let (_container, pool) = setup_db().await;
        let (member_id, item_id) = seed(&pool, "member1", 100);
        let repo = DieselOrderRepository::new(pool.clone());

        let order_id = repo.place(member_id, item_id, 10).expect("place failed");

        let order = repo.find_by_id(order_id).expect("find failed").expect("exists");
        assert_eq!(order.status, OrderStatus::Ordered);
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.total_price(), 20000);
        assert_eq!(order.delivery.address, Address::new("Seoul", "Saejeol", "123456"));
        assert_eq!(stock_of(&pool, item_id), 90);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn place_beyond_stock_fails_and_leaves_stock() {
        let (_container, pool) = setup_db().await;
        let (member_id, item_id) = seed(&pool, "member1", 100);
        let repo = DieselOrderRepository::new(pool.clone());

        let err = repo.place(member_id, item_id, 200).unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(stock_of(&pool, item_id), 100);
        assert!(repo.find_all(&OrderSearch::default()).expect("find_all failed").is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn place_for_unknown_member_is_not_found() {
        let (_container, pool) = setup_db().await;
        let (_, item_id) = seed(&pool, "member1", 100);
        let repo = DieselOrderRepository::new(pool);

        let err = repo.place(Uuid::new_v4(), item_id, 1).unwrap_err();

        assert!(matches!(err, DomainError::NotFound("Member")));
    }

    /// Two orders that each fit the stock but not together: at most one
    /// commits, the other reports an error, and stock never goes negative.
    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn racing_placements_never_oversell() {
        let (_container, pool) = setup_db().await;
        let (member_id, item_id) = seed(&pool, "member1", 100);
        let repo = Arc::new(DieselOrderRepository::new(pool.clone()));

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = [60, 70]
            .into_iter()
            .map(|count| {
                let repo = Arc::clone(&repo);
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    (count, repo.place(member_id, item_id, count))
                })
            })
            .collect();

        let mut removed = 0;
        let mut committed = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                (count, Ok(_)) => {
                    removed += count;
                    committed += 1;
                }
                (_, Err(e)) => assert!(
                    matches!(e, DomainError::InsufficientStock { .. } | DomainError::Internal(_)),
                    "unexpected {e:?}"
                ),
            }
        }

        assert_eq!(committed, 1);
        assert_eq!(stock_of(&pool, item_id), 100 - removed);
        assert_eq!(
            repo.find_all(&OrderSearch::default()).expect("find_all failed").len(),
            1
        );
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn cancel_restores_stock_once() {
        let (_container, pool) = setup_db().await;
        let (member_id, item_id) = seed(&pool, "member1", 100);
        let repo = DieselOrderRepository::new(pool.clone());
        let order_id = repo.place(member_id, item_id, 10).expect("place failed");

        repo.cancel(order_id).expect("cancel failed");

        let order = repo.find_by_id(order_id).expect("find failed").expect("exists");
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&pool, item_id), 100);

        let err = repo.cancel(order_id).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCancelled));
        assert_eq!(stock_of(&pool, item_id), 100);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn find_all_filters_by_member_and_status() {
        let (_container, pool) = setup_db().await;
        let (kim, kim_item) = seed(&pool, "kim", 100);
        let (lee, lee_item) = seed(&pool, "lee", 100);
        let repo = DieselOrderRepository::new(pool);
        let cancelled = repo.place(kim, kim_item, 1).expect("place failed");
        repo.place(lee, lee_item, 1).expect("place failed");
        repo.cancel(cancelled).expect("cancel failed");

        let by_name = repo
            .find_all(&OrderSearch {
                member_name: Some("ki".to_string()),
                order_status: None,
            })
            .expect("find_all failed");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, cancelled);

        let ordered = repo
            .find_all(&OrderSearch {
                member_name: None,
                order_status: Some(OrderStatus::Ordered),
            })
            .expect("find_all failed");
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].member_id, lee);
    }
}
