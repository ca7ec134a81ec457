use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::OrderService;
use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderSearch, OrderStatus};
use crate::errors::AppError;
use crate::infrastructure::{DieselOrderQueryStore, DieselOrderRepository};
use crate::query::strategy::DEFAULT_LIMIT;
use crate::query::{
    BatchLoader, OrderDto, OrderQueryService, Page, SimpleOrderDto, SimpleStrategy, Strategy,
};

use super::{blocking, CreatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub member_id: Uuid,
    pub item_id: Uuid,
    pub count: i32,
}

/// Query string of the order list endpoints. Unknown fields are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListOrdersParams {
    pub strategy: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub member_name: Option<String>,
    pub order_status: Option<String>,
}

impl ListOrdersParams {
    fn search(&self) -> Result<OrderSearch, DomainError> {
        Ok(OrderSearch {
            member_name: self.member_name.clone().filter(|n| !n.is_empty()),
            order_status: self
                .order_status
                .as_deref()
                .map(|s| s.parse::<OrderStatus>())
                .transpose()?,
        })
    }

    fn strategy(&self) -> Result<Strategy, DomainError> {
        self.strategy
            .as_deref()
            .map_or(Ok(Strategy::default()), |s| s.parse())
    }

    fn simple_strategy(&self) -> Result<SimpleStrategy, DomainError> {
        self.strategy
            .as_deref()
            .map_or(Ok(SimpleStrategy::default()), |s| s.parse())
    }

    /// Unpaged unless either bound is given.
    fn explicit_page(&self) -> Result<Option<Page>, DomainError> {
        if self.offset.is_none() && self.limit.is_none() {
            return Ok(None);
        }
        Page::new(self.offset.unwrap_or(0), self.limit.unwrap_or(DEFAULT_LIMIT)).map(Some)
    }
}

/// GET /orders
///
/// Order list with lines. The strategy picks the query shape; every strategy
/// returns the same orders and lines for the same filter.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("strategy" = Option<String>, Query, description = "naive | naive-dto | eager-toone | toone-join | toone-join-paged (default) | collection-join | dto-projection | dto-projection-optimized | flat"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of orders, 1..=1000"),
        ("memberName" = Option<String>, Query, description = "Substring of the member name"),
        ("orderStatus" = Option<String>, Query, description = "ORDERED or CANCELLED"),
    ),
    responses(
        (status = 200, description = "Orders", body = [OrderDto]),
        (status = 400, description = "Unknown strategy, filter or paging value"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    loader: web::Data<BatchLoader>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let strategy = params.strategy()?;
    let page = strategy.resolve_page(params.offset, params.limit)?;
    let search = params.search()?;
    let loader = *loader.get_ref();

    let projection = blocking(&pool, move |pool| {
        let service = OrderQueryService::new(DieselOrderQueryStore::from_pool(&pool)?, loader);
        service.list(strategy, &search, page)
    })
    .await?;

    Ok(HttpResponse::Ok().json(projection))
}

/// GET /simple-orders
///
/// Order list without lines.
#[utoipa::path(
    get,
    path = "/simple-orders",
    params(
        ("strategy" = Option<String>, Query, description = "naive | toone-join (default) | dto-projection"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Maximum number of orders, 1..=1000"),
        ("memberName" = Option<String>, Query, description = "Substring of the member name"),
        ("orderStatus" = Option<String>, Query, description = "ORDERED or CANCELLED"),
    ),
    responses(
        (status = 200, description = "Orders", body = [SimpleOrderDto]),
        (status = 400, description = "Unknown strategy, filter or paging value"),
    ),
    tag = "orders"
)]
pub async fn list_simple_orders(
    pool: web::Data<DbPool>,
    loader: web::Data<BatchLoader>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let strategy = params.simple_strategy()?;
    let page = params.explicit_page()?;
    let search = params.search()?;
    let loader = *loader.get_ref();

    let orders = blocking(&pool, move |pool| {
        let service = OrderQueryService::new(DieselOrderQueryStore::from_pool(&pool)?, loader);
        service.list_simple(strategy, &search, page)
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

/// POST /orders
///
/// Places an order for one item. Stock is checked and decremented in the
/// same transaction that writes the order.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = CreatedResponse),
        (status = 400, description = "Count is not positive"),
        (status = 404, description = "Member or item not found"),
        (status = 409, description = "Not enough stock"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let id = blocking(&pool, move |pool| {
        OrderService::new(DieselOrderRepository::new(pool)).order(
            body.member_id,
            body.item_id,
            body.count,
        )
    })
    .await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// POST /orders/{id}/cancel
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 204, description = "Order cancelled and stock restored"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already cancelled or delivered"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    blocking(&pool, move |pool| {
        OrderService::new(DieselOrderRepository::new(pool)).cancel_order(order_id)
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}
