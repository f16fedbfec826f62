use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::Principal,
    models::{
        CreatePostRequest, CreateTagRequest, HomeOrderRequest, Post, Tag, UpdatePostRequest,
    },
};

/// Accepted query parameters for the post listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostFilter {
    /// Substring match over title and content.
    pub search: Option<String>,
    /// Exact tag membership.
    pub tag: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TagFilter {
    pub search: Option<String>,
}

/// list_posts
///
/// GET /posts.
#[utoipa::path(
    get,
    path = "/posts",
    params(PostFilter),
    responses((status = 200, description = "Posts", body = [Post]))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> Json<Vec<Post>> {
    Json(state.repo.get_posts(filter.search, filter.tag).await)
}

/// get_post
///
/// GET /posts/{id}.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, StatusCode> {
    match state.repo.get_post(id).await {
        Some(post) => Ok(Json(post)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// create_post
///
/// POST /posts. Authorship is taken from the session, never from the payload.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    responses((status = 200, description = "Created", body = Post))
)]
pub async fn create_post(
    Principal { id, .. }: Principal,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, StatusCode> {
    match state.repo.create_post(payload, id).await {
        Some(post) => Ok(Json(post)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// update_post
///
/// PUT /posts/{id}. Partial update.
#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, StatusCode> {
    match state.repo.update_post(id, payload).await {
        Some(post) => Ok(Json(post)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_post
///
/// DELETE /posts/{id}.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_post(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// list_tags
///
/// GET /posts/tags. Feeds the tag picker's suggestions.
#[utoipa::path(
    get,
    path = "/posts/tags",
    params(TagFilter),
    responses((status = 200, description = "Tags", body = [Tag]))
)]
pub async fn list_tags(
    State(state): State<AppState>,
    Query(filter): Query<TagFilter>,
) -> Json<Vec<Tag>> {
    Json(state.repo.get_tags(filter.search).await)
}

/// create_tag
///
/// POST /posts/tags. Idempotent on the tag name.
#[utoipa::path(
    post,
    path = "/posts/tags",
    request_body = CreateTagRequest,
    responses((status = 200, description = "Tag", body = Tag))
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<Json<Tag>, StatusCode> {
    match state.repo.create_tag(payload.name).await {
        Some(tag) => Ok(Json(tag)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// list_home_posts
///
/// GET /home. The posts pinned to the public home screen, in position order.
#[utoipa::path(
    get,
    path = "/home",
    responses((status = 200, description = "Pinned posts", body = [Post]))
)]
pub async fn list_home_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.repo.get_home_posts().await)
}

/// reorder_home_posts
///
/// PUT /home. Replaces the pinned layout wholesale: listed posts take their
/// list index as position, everything else is unpinned.
#[utoipa::path(
    put,
    path = "/home",
    request_body = HomeOrderRequest,
    responses(
        (status = 200, description = "Reordered", body = [Post]),
        (status = 500, description = "Reorder failed")
    )
)]
pub async fn reorder_home_posts(
    State(state): State<AppState>,
    Json(payload): Json<HomeOrderRequest>,
) -> Result<Json<Vec<Post>>, StatusCode> {
    if !state.repo.set_home_order(payload.post_ids).await {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.repo.get_home_posts().await))
}
