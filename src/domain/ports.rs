use uuid::Uuid;

use super::category::Category;
use super::errors::DomainError;
use super::item::Item;
use super::member::Member;
use super::order::{Order, OrderSearch};

pub trait MemberRepository: Send + Sync + 'static {
    fn save(&self, member: &Member) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, DomainError>;
    fn find_all(&self) -> Result<Vec<Member>, DomainError>;
    fn find_by_name(&self, name: &str) -> Result<Vec<Member>, DomainError>;
}

pub trait ItemRepository: Send + Sync + 'static {
    fn save(&self, item: &Item) -> Result<(), DomainError>;
    /// Applies `change` to the stored item while its row is locked and writes
    /// the result back in the same transaction. Nothing is written when
    /// `change` fails.
    fn update<F>(&self, id: Uuid, change: F) -> Result<Item, DomainError>
    where
        F: FnOnce(&mut Item) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError>;
    fn find_all(&self) -> Result<Vec<Item>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Places an order for `count` units of one item. Member lookup, stock
    /// check and every insert happen in one serializable transaction.
    fn place(&self, member_id: Uuid, item_id: Uuid, count: i32) -> Result<Uuid, DomainError>;
    /// Cancels the order and puts each line's count back into stock, in one
    /// serializable transaction.
    fn cancel(&self, order_id: Uuid) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_all(&self, search: &OrderSearch) -> Result<Vec<Order>, DomainError>;
}

pub trait CategoryRepository: Send + Sync + 'static {
    fn save(&self, category: &Category) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError>;
    fn find_children(&self, parent_id: Uuid) -> Result<Vec<Category>, DomainError>;
    fn add_item(&self, category_id: Uuid, item_id: Uuid) -> Result<(), DomainError>;
}
