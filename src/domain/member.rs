use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Postal address. A value type: two addresses are the same address when all
/// three parts match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl Address {
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            zipcode: zipcode.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub address: Address,
}
