use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

/// Kind-specific attributes of a catalogue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemKind {
    Book { author: String, isbn: String },
    Album { artist: String, etc: String },
    Movie { director: String, actor: String },
}

impl ItemKind {
    /// Single-character discriminator stored in the `dtype` column.
    pub fn discriminator(&self) -> &'static str {
        match self {
            ItemKind::Book { .. } => "B",
            ItemKind::Album { .. } => "A",
            ItemKind::Movie { .. } => "M",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub kind: ItemKind,
}

impl Item {
    pub fn add_stock(&mut self, quantity: i32) {
        self.stock_quantity += quantity;
    }

    /// Takes `quantity` units out of stock. Stock never goes negative: on
    /// failure the item is left untouched.
    pub fn remove_stock(&mut self, quantity: i32) -> Result<(), DomainError> {
        let rest = self.stock_quantity - quantity;
        if rest < 0 {
            return Err(DomainError::InsufficientStock {
                item_id: self.id,
                requested: quantity,
                available: self.stock_quantity,
            });
        }
        self.stock_quantity = rest;
        Ok(())
    }

    pub fn change(&mut self, name: String, price: i32, stock_quantity: i32) -> Result<(), DomainError> {
        validate_fields(&name, price, stock_quantity)?;
        self.name = name;
        self.price = price;
        self.stock_quantity = stock_quantity;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub kind: ItemKind,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_fields(&self.name, self.price, self.stock_quantity)
    }
}

fn validate_fields(name: &str, price: i32, stock_quantity: i32) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidInput("item name must not be empty".into()));
    }
    if price < 0 {
        return Err(DomainError::InvalidInput("price must not be negative".into()));
    }
    if stock_quantity < 0 {
        return Err(DomainError::InvalidInput(
            "stock quantity must not be negative".into(),
        ));
    }
    Ok(())
}
