use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::ItemService;
use crate::db::DbPool;
use crate::domain::item::{Item, ItemKind, NewItem};
use crate::errors::AppError;
use crate::infrastructure::DieselItemRepository;

use super::{blocking, CreatedResponse};

/// Body of `POST /items`. The kind tag and its fields sit next to the common
/// fields, e.g. `{"name": "JPA", "price": 10000, "stockQuantity": 100,
/// "kind": "book", "author": "kim", "isbn": "1234"}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    #[serde(flatten)]
    pub kind: ItemKind,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            stock_quantity: item.stock_quantity,
            kind: item.kind,
        }
    }
}

/// POST /items
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item registered", body = CreatedResponse),
        (status = 400, description = "Empty name or negative price/stock"),
    ),
    tag = "items"
)]
pub async fn create_item(
    pool: web::Data<DbPool>,
    body: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let new_item = NewItem {
        name: body.name,
        price: body.price,
        stock_quantity: body.stock_quantity,
        kind: body.kind,
    };

    let id = blocking(&pool, move |pool| {
        ItemService::new(DieselItemRepository::new(pool)).save_item(new_item)
    })
    .await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// GET /items
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "All items", body = [ItemResponse]),
    ),
    tag = "items"
)]
pub async fn list_items(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let items = blocking(&pool, |pool| {
        ItemService::new(DieselItemRepository::new(pool)).find_items()
    })
    .await?;

    let body: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /items/{id}
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item UUID"),
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found"),
    ),
    tag = "items"
)]
pub async fn get_item(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let item = blocking(&pool, move |pool| {
        ItemService::new(DieselItemRepository::new(pool)).find_one(id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// PUT /items/{id}
///
/// Changes name, price and stock. The kind cannot be changed.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item UUID"),
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Empty name or negative price/stock"),
        (status = 404, description = "Item not found"),
    ),
    tag = "items"
)]
pub async fn update_item(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    let item = blocking(&pool, move |pool| {
        ItemService::new(DieselItemRepository::new(pool)).update_item(
            id,
            body.name,
            body.price,
            body.stock_quantity,
        )
    })
    .await?;

    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}
