use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::MemberService;
use crate::db::DbPool;
use crate::domain::member::Address;
use crate::errors::AppError;
use crate::infrastructure::DieselMemberRepository;
use crate::query::dto::MemberGraph;

use super::{blocking, CreatedResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

/// POST /members
#[utoipa::path(
    post,
    path = "/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member joined", body = CreatedResponse),
        (status = 400, description = "Empty or duplicate name"),
    ),
    tag = "members"
)]
pub async fn create_member(
    pool: web::Data<DbPool>,
    body: web::Json<CreateMemberRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let address = Address::new(body.city, body.street, body.zipcode);

    let id = blocking(&pool, move |pool| {
        MemberService::new(DieselMemberRepository::new(pool)).join(body.name, address)
    })
    .await?;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// GET /members
#[utoipa::path(
    get,
    path = "/members",
    responses(
        (status = 200, description = "All members", body = [MemberGraph]),
    ),
    tag = "members"
)]
pub async fn list_members(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let members = blocking(&pool, |pool| {
        MemberService::new(DieselMemberRepository::new(pool)).find_members()
    })
    .await?;

    let body: Vec<MemberGraph> = members.into_iter().map(MemberGraph::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
