//! Transfer whose transaction boundary is delegated to a `TransactionManager`.
//!
//! The service never sees the pool. It asks the manager for a transaction,
//! runs the transfer on the status' connection and tells the manager whether
//! to commit or roll back.

use std::sync::Arc;

use crate::{
    error::AppError,
    services::{
        transaction_manager::TransactionManager,
        transfer::{self, DestinationGuard},
    },
};

#[derive(Clone)]
pub struct ManagedTransferService {
    transaction_manager: TransactionManager,
    guard: Arc<dyn DestinationGuard>,
}

impl ManagedTransferService {
    pub fn new(transaction_manager: TransactionManager, guard: Arc<dyn DestinationGuard>) -> Self {
        Self {
            transaction_manager,
            guard,
        }
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

        let mut status = self.transaction_manager.get_transaction().await?;

        let result = transfer::move_money(
            status.connection(),
            self.guard.as_ref(),
            from_id,
            to_id,
            amount,
        )
        .await;

        match result {
            Ok(()) => self
                .transaction_manager
                .commit(status)
                .await
                .map_err(AppError::transfer_failed),
            Err(err) => {
                if let Err(rollback_err) = self.transaction_manager.rollback(status).await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(AppError::transfer_failed(err))
            }
        }
    }
}
