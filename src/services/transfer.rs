//! The transfer itself, independent of where its transaction boundary sits.
//!
//! Every transfer service runs [`move_money`] on a connection that already
//! has a transaction open. The services differ only in how that transaction
//! is begun, committed and rolled back.

use sqlx::SqliteConnection;

use crate::{error::AppError, models::member::Member, repository::member_repository};

/// Decides whether a destination may receive a transfer.
///
/// It is checked after the source has been debited, so a rejection
/// exercises the rollback path.
pub trait DestinationGuard: Send + Sync {
    fn check(&self, destination: &Member) -> Result<(), AppError>;
}

/// Accepts every destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl DestinationGuard for AcceptAll {
    fn check(&self, _destination: &Member) -> Result<(), AppError> {
        Ok(())
    }
}

/// Rejects transfers to one specific member id.
#[derive(Debug, Clone)]
pub struct RejectMember {
    member_id: String,
}

impl RejectMember {
    pub fn new(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
        }
    }
}

impl DestinationGuard for RejectMember {
    fn check(&self, destination: &Member) -> Result<(), AppError> {
        if destination.member_id == self.member_id {
            return Err(AppError::TransferRejected(format!(
                "transfers to {} are not accepted",
                destination.member_id
            )));
        }
        Ok(())
    }
}

/// Reject requests that can never succeed, before any connection is taken.
pub fn validate_request(from_id: &str, to_id: &str, amount: i64) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }

    // Both updates would target the same row and the credit would win
    if from_id == to_id {
        return Err(AppError::InvalidRequest(
            "Cannot transfer to same member".to_string(),
        ));
    }

    Ok(())
}

/// Debit `from_id` and credit `to_id` by `amount` on `conn`.
///
/// # Process
///
/// 1. Look up both members
/// 2. Debit the source
/// 3. Let the guard inspect the destination
/// 4. Credit the destination
///
/// Nothing is committed here. Any error leaves the debit in place, and the
/// caller must roll the transaction back.
pub async fn move_money(
    conn: &mut SqliteConnection,
    guard: &dyn DestinationGuard,
    from_id: &str,
    to_id: &str,
    amount: i64,
) -> Result<(), AppError> {
    let from_member = member_repository::find_by_id(&mut *conn, from_id).await?;
    let to_member = member_repository::find_by_id(&mut *conn, to_id).await?;

    let debited = from_member
        .money
        .checked_sub(amount)
        .ok_or_else(|| AppError::InvalidRequest(format!("balance of {from_id} would overflow")))?;
    member_repository::update(&mut *conn, from_id, debited).await?;

    guard.check(&to_member)?;

    let credited = to_member
        .money
        .checked_add(amount)
        .ok_or_else(|| AppError::InvalidRequest(format!("balance of {to_id} would overflow")))?;
    member_repository::update(&mut *conn, to_id, credited).await?;

    Ok(())
}
