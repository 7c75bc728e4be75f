//! Transfer HTTP handler.
//!
//! - POST /api/v1/transfers - Move money between two members

use axum::{Json, extract::State};

use crate::{
    app::AppState,
    error::AppError,
    models::member::{TransferRequest, TransferResponse},
};

/// Transfer money from one member to another.
///
/// # Request Body
///
/// ```json
/// {
///   "from_id": "memberA",
///   "to_id": "memberB",
///   "amount": 2000
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Balances of both members after the commit
/// - **Error (400)**: Amount is not positive, or both ids are the same
/// - **Error (404)**: Either member does not exist
/// - **Error (422)**: The destination was rejected
///
/// On any error after the transaction began, both balances are unchanged.
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    tracing::info!(
        from_id = %request.from_id,
        to_id = %request.to_id,
        amount = request.amount,
        "transfer requested"
    );

    state
        .transfers
        .account_transfer(&request.from_id, &request.to_id, request.amount)
        .await?;

    let from = state.members.find_by_id(&request.from_id).await?;
    let to = state.members.find_by_id(&request.to_id).await?;

    Ok(Json(TransferResponse { from, to }))
}
