use log::info;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderSearch};
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn order(&self, member_id: Uuid, item_id: Uuid, count: i32) -> Result<Uuid, DomainError> {
        let order_id = self.repo.place(member_id, item_id, count)?;
        info!("order {order_id} placed: member={member_id} item={item_id} count={count}");
        Ok(order_id)
    }

    /// Cancelling an order that is already cancelled is rejected, so stock is
    /// restored at most once.
    pub fn cancel_order(&self, order_id: Uuid) -> Result<(), DomainError> {
        self.repo.cancel(order_id)?;
        info!("order {order_id} cancelled");
        Ok(())
    }

    pub fn find_orders(&self, search: &OrderSearch) -> Result<Vec<Order>, DomainError> {
        self.repo.find_all(search)
    }
}
