use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ItemRepository};

pub struct CategoryService<C, I> {
    categories: C,
    items: I,
}

impl<C: CategoryRepository, I: ItemRepository> CategoryService<C, I> {
    pub fn new(categories: C, items: I) -> Self {
        Self { categories, items }
    }

    pub fn create(&self, name: String, parent_id: Option<Uuid>) -> Result<Category, DomainError> {
        if let Some(parent_id) = parent_id {
            self.find_one(parent_id)?;
        }
        let category = Category::new(name, parent_id)?;
        self.categories.save(&category)?;
        Ok(category)
    }

    pub fn children(&self, id: Uuid) -> Result<Vec<Category>, DomainError> {
        self.find_one(id)?;
        self.categories.find_children(id)
    }

    pub fn add_item(&self, category_id: Uuid, item_id: Uuid) -> Result<(), DomainError> {
        self.find_one(category_id)?;
        if self.items.find_by_id(item_id)?.is_none() {
            return Err(DomainError::NotFound("Item"));
        }
        self.categories.add_item(category_id, item_id)
    }

    pub fn find_one(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Category"))
    }
}
