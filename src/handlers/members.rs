//! Member management HTTP handlers.
//!
//! This module implements the member-related API endpoints:
//! - POST /api/v1/members - Save a new member
//! - GET /api/v1/members - List all members
//! - GET /api/v1/members/{id} - Get member by id
//! - PUT /api/v1/members/{id} - Replace a member's balance
//! - DELETE /api/v1/members/{id} - Remove a member

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    app::AppState,
    error::AppError,
    models::member::{Member, SaveMemberRequest, UpdateMemberRequest},
};

/// Save a new member.
///
/// # Request Body
///
/// ```json
/// {
///   "member_id": "memberA",
///   "money": 10000
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the saved member
/// - **Error (409)**: A member with this id already exists
pub async fn save_member(
    State(state): State<AppState>,
    Json(request): Json<SaveMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.member_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "member_id must not be empty".to_string(),
        ));
    }

    let member = state.members.save(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// List all members, ordered by id.
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, AppError> {
    let members = state.members.find_all().await?;

    Ok(Json(members))
}

/// Get a member by id.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the member
/// - **Error (404)**: No member has this id
pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<Json<Member>, AppError> {
    let member = state.members.find_by_id(&member_id).await?;

    Ok(Json(member))
}

/// Replace a member's balance.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the member with its new balance
/// - **Error (404)**: No member has this id
pub async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<Member>, AppError> {
    state.members.update(&member_id, request.money).await?;

    Ok(Json(Member::new(member_id, request.money)))
}

/// Remove a member.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: No member has this id
pub async fn delete_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.members.delete(&member_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
