pub mod category_repo;
pub mod item_repo;
pub mod member_repo;
pub mod models;
pub mod order_query_repo;
pub mod order_repo;
#[cfg(test)]
pub(crate) mod testing;

pub use category_repo::DieselCategoryRepository;
pub use item_repo::DieselItemRepository;
pub use member_repo::DieselMemberRepository;
pub use order_query_repo::DieselOrderQueryStore;
pub use order_repo::DieselOrderRepository;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
