use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::CategoryService;
use crate::db::DbPool;
use crate::domain::category::Category;
use crate::errors::AppError;
use crate::infrastructure::{DieselCategoryRepository, DieselItemRepository};

use super::blocking;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

fn service(pool: DbPool) -> CategoryService<DieselCategoryRepository, DieselItemRepository> {
    CategoryService::new(
        DieselCategoryRepository::new(pool.clone()),
        DieselItemRepository::new(pool),
    )
}

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Parent category not found"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    pool: web::Data<DbPool>,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let category = blocking(&pool, move |pool| {
        service(pool).create(body.name, body.parent_id)
    })
    .await?;

    Ok(HttpResponse::Created().json(category))
}

/// GET /categories/{id}/children
#[utoipa::path(
    get,
    path = "/categories/{id}/children",
    params(
        ("id" = Uuid, Path, description = "Category UUID"),
    ),
    responses(
        (status = 200, description = "Direct children", body = [Category]),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn list_children(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let children = blocking(&pool, move |pool| service(pool).children(id)).await?;

    Ok(HttpResponse::Ok().json(children))
}

/// POST /categories/{id}/items/{item_id}
#[utoipa::path(
    post,
    path = "/categories/{id}/items/{item_id}",
    params(
        ("id" = Uuid, Path, description = "Category UUID"),
        ("item_id" = Uuid, Path, description = "Item UUID"),
    ),
    responses(
        (status = 204, description = "Item linked"),
        (status = 404, description = "Category or item not found"),
    ),
    tag = "categories"
)]
pub async fn add_item(
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (category_id, item_id) = path.into_inner();

    blocking(&pool, move |pool| service(pool).add_item(category_id, item_id)).await?;

    Ok(HttpResponse::NoContent().finish())
}
