//! Transfer with a hand-managed transaction on one pooled connection.
//!
//! The service borrows a connection from the pool, begins a transaction on
//! it, passes that same connection to every repository call, and then
//! commits or rolls back itself. The connection is handed back to the pool
//! only after the outcome is decided.

use std::sync::Arc;

use sqlx::Connection;

use crate::{
    db::{BEGIN_IMMEDIATE, DbPool},
    error::AppError,
    services::transfer::{self, DestinationGuard},
};

#[derive(Clone)]
pub struct ManualTransferService {
    pool: DbPool,
    guard: Arc<dyn DestinationGuard>,
}

impl ManualTransferService {
    pub fn new(pool: DbPool, guard: Arc<dyn DestinationGuard>) -> Self {
        Self { pool, guard }
    }

    /// Move `amount` from `from_id` to `to_id` as one transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: Amount is not positive, or both ids are the same
    /// - `TransferFailed`: Anything went wrong after the transaction began;
    ///   every change was rolled back
    pub async fn account_transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: i64,
    ) -> Result<(), AppError> {
        transfer::validate_request(from_id, to_id, amount)?;

        let mut conn = self.pool.acquire().await?;
        tracing::debug!("get connection");

        let outcome = {
            let mut tx = conn.begin_with(BEGIN_IMMEDIATE).await?;

            match transfer::move_money(&mut tx, self.guard.as_ref(), from_id, to_id, amount).await
            {
                Ok(()) => tx.commit().await.map_err(AppError::from),
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::error!(error = %rollback_err, "rollback failed");
                    }
                    Err(err)
                }
            }
        };

        // Back to the pool with no transaction left open on it
        drop(conn);
        tracing::debug!("connection released");

        outcome.map_err(AppError::transfer_failed)
    }
}
