use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

/// A node in the category tree. Only the parent link is stored; children are
/// looked up by `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

impl Category {
    pub fn new(name: String, parent_id: Option<Uuid>) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            parent_id,
        })
    }
}
