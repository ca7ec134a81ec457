use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::item::Item;
use crate::domain::ports::ItemRepository;
use crate::schema::items;

use super::models::ItemRow;

pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ItemRepository for DieselItemRepository {
    fn save(&self, item: &Item) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(items::table)
            .values(&ItemRow::from(item))
            .execute(&mut conn)?;
        Ok(())
    }

    fn update<F>(&self, id: Uuid, change: F) -> Result<Item, DomainError>
    where
        F: FnOnce(&mut Item) -> Result<(), DomainError>,
    {
        let mut conn = self.pool.get()?;

        conn.build_transaction()
            .serializable()
            .run::<_, DomainError, _>(|conn| {
                let mut item = Item::try_from(
                    items::table
                        .find(id)
                        .select(ItemRow::as_select())
                        .for_update()
                        .first::<ItemRow>(conn)
                        .optional()?
                        .ok_or(DomainError::NotFound("Item"))?,
                )?;

                change(&mut item)?;

                diesel::update(items::table.find(id))
                    .set(&ItemRow::from(&item))
                    .execute(conn)?;
                Ok(item)
            })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        items::table
            .find(id)
            .select(ItemRow::as_select())
            .first::<ItemRow>(&mut conn)
            .optional()?
            .map(Item::try_from)
            .transpose()
    }

    fn find_all(&self) -> Result<Vec<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        items::table
            .select(ItemRow::as_select())
            .order(items::name.asc())
            .load::<ItemRow>(&mut conn)?
            .into_iter()
            .map(Item::try_from)
            .collect()
    }
}
