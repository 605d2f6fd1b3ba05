use axum::{extract::{Path, State}, Json};
use common::types::{Count, Message};
use service::people::Person;
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::AppState;

/// 创建记录：id 不得与已有记录重复
#[utoipa::path(post, path = "/items/", tag = "items", request_body = crate::openapi::PersonDoc, responses((status = 200, description = "Created", body = crate::openapi::PersonDoc), (status = 400, description = "ID already exists", body = crate::openapi::ErrorDoc), (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)))]
pub async fn create_item(
    State(state): State<AppState>,
    Json(person): Json<Person>,
) -> Result<Json<Person>, JsonApiError> {
    let created = state.people.create(person).await?;
    info!(id = created.id, "item created");
    Ok(Json(created))
}

/// 按存储顺序列出全部记录
#[utoipa::path(get, path = "/items/", tag = "items", responses((status = 200, description = "OK", body = [crate::openapi::PersonDoc])))]
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Person>> {
    Json(state.people.list().await)
}

/// 根据 id 获取记录
#[utoipa::path(get, path = "/items/{id}", tag = "items", params(("id" = i64, Path, description = "Record id")), responses((status = 200, description = "OK", body = crate::openapi::PersonDoc), (status = 404, description = "Item not found", body = crate::openapi::ErrorDoc)))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Person>, JsonApiError> {
    state.people.get(id).await.map(Json).map_err(Into::into)
}

/// 整体替换指定记录；请求体中的 id 成为新的存储 id
#[utoipa::path(put, path = "/items/{id}", tag = "items", params(("id" = i64, Path, description = "Record id")), request_body = crate::openapi::PersonDoc, responses((status = 200, description = "Updated", body = crate::openapi::PersonDoc), (status = 400, description = "ID already exists", body = crate::openapi::ErrorDoc), (status = 404, description = "Item not found", body = crate::openapi::ErrorDoc)))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(person): Json<Person>,
) -> Result<Json<Person>, JsonApiError> {
    let updated = state.people.update(id, person).await?;
    info!(path_id = id, id = updated.id, "item updated");
    Ok(Json(updated))
}

/// 删除指定记录
#[utoipa::path(delete, path = "/items/{id}", tag = "items", params(("id" = i64, Path, description = "Record id")), responses((status = 200, description = "Deleted", body = crate::openapi::MessageDoc), (status = 404, description = "Item not found", body = crate::openapi::ErrorDoc)))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, JsonApiError> {
    state.people.delete(id).await?;
    info!(id, "item deleted");
    Ok(Json(Message::new("Item deleted successfully")))
}

/// 记录总数
#[utoipa::path(get, path = "/items/count", tag = "items", responses((status = 200, description = "OK", body = crate::openapi::CountDoc)))]
pub async fn count_items(State(state): State<AppState>) -> Json<Count> {
    Json(Count { count: state.people.count().await })
}
