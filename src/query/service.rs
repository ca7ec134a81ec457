use std::collections::HashMap;

use log::{debug, warn};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::item::Item;
use crate::domain::order::{line_total, OrderSearch};

use super::batch::BatchLoader;
use super::dto::{
    OrderDto, OrderGraph, OrderItemDto, OrderItemGraph, Projection, SimpleOrderDto,
};
use super::grouping::{dedup_joined, regroup, regroup_flat};
use super::store::{OrderQueryStore, Page};
use super::strategy::{SimpleStrategy, Strategy};

/// Materializes order lists from an [`OrderQueryStore`] with the strategy
/// the caller picks. Strategies differ in statement count and paging
/// behaviour, never in the orders and lines they return.
pub struct OrderQueryService<S> {
    store: S,
    loader: BatchLoader,
}

impl<S: OrderQueryStore> OrderQueryService<S> {
    pub fn new(store: S, loader: BatchLoader) -> Self {
        Self { store, loader }
    }

    pub fn statements_issued(&self) -> usize {
        self.store.statements_issued()
    }

    pub fn list(
        &self,
        strategy: Strategy,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Projection, DomainError> {
        let before = self.store.statements_issued();

        let projection = match strategy {
            Strategy::Naive => Projection::Graph(self.walk(search, page)?),
            Strategy::NaiveDto => Projection::Orders(
                self.walk(search, page)?.iter().map(OrderDto::from).collect(),
            ),
            Strategy::EagerToOne | Strategy::ToOneJoin | Strategy::ToOneJoinPaged => {
                Projection::Orders(self.toone_join_batched(search, page)?)
            }
            Strategy::CollectionJoin => {
                let orders = dedup_joined(self.store.find_flat(search)?);
                Projection::Orders(page_in_memory(strategy, orders, page))
            }
            Strategy::DtoProjection => Projection::Orders(self.dto_per_order(search, page)?),
            Strategy::DtoProjectionOptimized => {
                Projection::Orders(self.dto_single_lookup(search, page)?)
            }
            Strategy::Flat => {
                let orders = regroup_flat(self.store.find_flat(search)?)?;
                Projection::Orders(page_in_memory(strategy, orders, page))
            }
        };

        debug!(
            "strategy={} orders={} statements={}",
            strategy,
            projection.len(),
            self.store.statements_issued() - before
        );
        Ok(projection)
    }

    pub fn list_simple(
        &self,
        strategy: SimpleStrategy,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<SimpleOrderDto>, DomainError> {
        let before = self.store.statements_issued();

        let orders = match strategy {
            SimpleStrategy::Naive => self
                .store
                .find_orders(search, page)?
                .into_iter()
                .map(|o| {
                    let member = self.store.find_member(o.member_id)?;
                    let delivery = self.store.find_delivery(o.delivery_id)?;
                    Ok(SimpleOrderDto {
                        order_id: o.id,
                        member_name: member.name,
                        order_date: o.order_date,
                        status: o.status,
                        address: delivery.address,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?,
            SimpleStrategy::ToOneJoin => self
                .store
                .find_orders_joined(search, page)?
                .into_iter()
                .map(|j| SimpleOrderDto {
                    order_id: j.order.id,
                    member_name: j.member.name,
                    order_date: j.order.order_date,
                    status: j.order.status,
                    address: j.delivery.address,
                })
                .collect(),
            SimpleStrategy::DtoProjection => {
                self.store.find_orders_with_member_delivery(search, page)?
            }
        };

        debug!(
            "simple strategy={} orders={} statements={}",
            strategy,
            orders.len(),
            self.store.statements_issued() - before
        );
        Ok(orders)
    }

    /// One statement for the roots, then one per association per row.
    fn walk(&self, search: &OrderSearch, page: Option<Page>) -> Result<Vec<OrderGraph>, DomainError> {
        self.store
            .find_orders(search, page)?
            .into_iter()
            .map(|o| {
                let member = self.store.find_member(o.member_id)?;
                let delivery = self.store.find_delivery(o.delivery_id)?;
                let order_items = self
                    .store
                    .find_order_items(o.id)?
                    .into_iter()
                    .map(|oi| {
                        let item = self.store.find_item(oi.item_id)?;
                        Ok(OrderItemGraph {
                            id: oi.id,
                            item: item.into(),
                            order_price: oi.order_price,
                            count: oi.count,
                            total_price: line_total(oi.order_price, oi.count),
                        })
                    })
                    .collect::<Result<Vec<_>, DomainError>>()?;

                Ok(OrderGraph {
                    id: o.id,
                    member: member.into(),
                    delivery,
                    total_price: order_items.iter().map(|oi| oi.total_price).sum(),
                    order_items,
                    status: o.status,
                    order_date: o.order_date,
                })
            })
            .collect()
    }

    /// Roots with member and delivery joined, then order lines and their
    /// items through the batch loader.
    fn toone_join_batched(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<OrderDto>, DomainError> {
        let roots = self.store.find_orders_with_member_delivery(search, page)?;

        let order_items = self.loader.load(roots.iter().map(|r| r.order_id), |ids| {
            self.store.find_order_items_in(ids)
        })?;
        let items: HashMap<Uuid, Item> = self
            .loader
            .load(order_items.iter().map(|oi| oi.item_id), |ids| {
                self.store.find_items_in(ids)
            })?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let lines = order_items
            .into_iter()
            .map(|oi| {
                let item = items.get(&oi.item_id).ok_or_else(|| {
                    DomainError::InvariantViolation(format!(
                        "item {} of order {} missing from batch",
                        oi.item_id, oi.order_id
                    ))
                })?;
                Ok(OrderItemDto {
                    order_id: oi.order_id,
                    item_id: item.id,
                    item_name: item.name.clone(),
                    unit_price: oi.order_price,
                    count: oi.count,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        regroup(roots, lines)
    }

    fn dto_per_order(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<OrderDto>, DomainError> {
        self.store
            .find_orders_with_member_delivery(search, page)?
            .into_iter()
            .map(|root| {
                let lines = self.store.find_order_lines(root.order_id)?;
                Ok(OrderDto::new(root, lines))
            })
            .collect()
    }

    fn dto_single_lookup(
        &self,
        search: &OrderSearch,
        page: Option<Page>,
    ) -> Result<Vec<OrderDto>, DomainError> {
        let roots = self.store.find_orders_with_member_delivery(search, page)?;
        if roots.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = roots.iter().map(|r| r.order_id).collect();
        let lines = self.store.find_order_lines_in(&ids)?;
        regroup(roots, lines)
    }
}

fn page_in_memory(strategy: Strategy, orders: Vec<OrderDto>, page: Option<Page>) -> Vec<OrderDto> {
    match page {
        Some(page) => {
            warn!(
                "strategy={} cannot page in SQL; cutting offset={} limit={} from {} orders in memory",
                strategy,
                page.offset,
                page.limit,
                orders.len()
            );
            page.slice(orders)
        }
        None => orders,
    }
}
