use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::ports::CategoryRepository;
use crate::schema::{categories, category_items};

use super::models::{CategoryItemRow, CategoryRow};

pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for DieselCategoryRepository {
    fn save(&self, category: &Category) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(categories::table)
            .values(&CategoryRow::from(category))
            .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first::<CategoryRow>(&mut conn)
            .optional()?;
        Ok(row.map(Category::from))
    }

    fn find_children(&self, parent_id: Uuid) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = categories::table
            .filter(categories::parent_id.eq(parent_id))
            .select(CategoryRow::as_select())
            .order(categories::name.asc())
            .load::<CategoryRow>(&mut conn)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn add_item(&self, category_id: Uuid, item_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(category_items::table)
            .values(&CategoryItemRow {
                category_id,
                item_id,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;
        Ok(())
    }
}
