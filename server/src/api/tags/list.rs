use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::get_conn;
use crate::schema::{tag_types, tags};
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TagItem {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagTypeGroup {
    pub id: i32,
    pub name: String,
    pub tags: Vec<TagItem>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    pub tag_types: Vec<TagTypeGroup>,
}

// (tag_type_id, tag_type_name, tag_id, tag_name); tag is absent for empty types
type TagRow = (i32, String, Option<i32>, Option<String>);

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "Tag types with their tags", body = TagsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_tags(
    AuthUser(_actor): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<TagRow> = match tag_types::table
        .left_join(tags::table)
        .order((tag_types::name.asc(), tags::name.asc()))
        .select((
            tag_types::id,
            tag_types::name,
            tags::id.nullable(),
            tags::name.nullable(),
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => return AppError::from(e).into_response(),
    };

    Json(TagsResponse {
        tag_types: group_tags(rows),
    })
    .into_response()
}

/// Fold ordered join rows into one group per tag type.
fn group_tags(rows: Vec<TagRow>) -> Vec<TagTypeGroup> {
    let mut groups: Vec<TagTypeGroup> = Vec::new();
    for (type_id, type_name, tag_id, tag_name) in rows {
        if groups.last().map(|g| g.id) != Some(type_id) {
            groups.push(TagTypeGroup {
                id: type_id,
                name: type_name,
                tags: Vec::new(),
            });
        }
        if let (Some(id), Some(name), Some(group)) = (tag_id, tag_name, groups.last_mut()) {
            group.tags.push(TagItem { id, name });
        }
    }
    groups
}
