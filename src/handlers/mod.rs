pub mod categories;
pub mod items;
pub mod members;
pub mod orders;

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// Runs blocking repository work on the actix thread pool.
pub(crate) async fn blocking<F, T>(pool: &DbPool, f: F) -> Result<T, crate::errors::AppError>
where
    F: FnOnce(DbPool) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    Ok(actix_web::web::block(move || f(pool)).await??)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::list_orders,
        orders::list_simple_orders,
        orders::create_order,
        orders::cancel_order,
        members::create_member,
        members::list_members,
        items::create_item,
        items::list_items,
        items::get_item,
        items::update_item,
        categories::create_category,
        categories::list_children,
        categories::add_item,
    ),
    components(schemas(
        CreatedResponse,
        crate::query::OrderDto,
        crate::query::OrderItemDto,
        crate::query::SimpleOrderDto,
        crate::query::dto::OrderGraph,
        crate::domain::member::Address,
        crate::domain::order::OrderStatus,
        crate::domain::category::Category,
        crate::domain::item::ItemKind,
    )),
    tags(
        (name = "orders", description = "Order placement and order list projections"),
        (name = "members"),
        (name = "items"),
        (name = "categories"),
    )
)]
pub struct ApiDoc;
