use log::info;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::item::{Item, NewItem};
use crate::domain::ports::ItemRepository;

pub struct ItemService<R> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn save_item(&self, new_item: NewItem) -> Result<Uuid, DomainError> {
        new_item.validate()?;
        let item = Item {
            id: Uuid::new_v4(),
            name: new_item.name,
            price: new_item.price,
            stock_quantity: new_item.stock_quantity,
            kind: new_item.kind,
        };
        self.repo.save(&item)?;
        info!("item {} registered", item.id);
        Ok(item.id)
    }

    /// Changes name, price and stock of a stored item. Kind-specific fields
    /// are left as they are.
    pub fn update_item(
        &self,
        id: Uuid,
        name: String,
        price: i32,
        stock_quantity: i32,
    ) -> Result<Item, DomainError> {
        self.repo
            .update(id, |item| item.change(name, price, stock_quantity))
    }

    pub fn find_items(&self) -> Result<Vec<Item>, DomainError> {
        self.repo.find_all()
    }

    pub fn find_one(&self, id: Uuid) -> Result<Item, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Item"))
    }
}
