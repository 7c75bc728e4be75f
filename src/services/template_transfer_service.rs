//! Transfer run as a `TransactionTemplate` callback.
//!
//! The template owns begin, commit and rollback. The service only supplies
//! the work to run inside the transaction.

use std::sync::Arc;

use crate::{
    error::AppError,
    services::{
        transaction_manager::{TransactionManager, TransactionTemplate},
        transfer::{self, DestinationGuard},
    },
};

#[derive(Clone)]
pub struct TemplateTransferService {
    tx_template: TransactionTemplate,
    guard: Arc<dyn DestinationGuard>,
}

impl TemplateTransferService {
    pub fn new(transaction_manager: TransactionManager, guard: Arc<dyn DestinationGuard>) -> Self {
        Self {
            tx_template: TransactionTemplate::new(transaction_manager),
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

        // The callback must not borrow from this frame
        let guard = Arc::clone(&self.guard);
        let from_id = from_id.to_owned();
        let to_id = to_id.to_owned();

        self.tx_template
            .execute(move |status| {
                Box::pin(async move {
                    transfer::move_money(
                        status.connection(),
                        guard.as_ref(),
                        &from_id,
                        &to_id,
                        amount,
                    )
                    .await
                })
            })
            .await
            .map_err(AppError::transfer_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::test_pool, models::member::Member, repository::MemberRepository,
        services::transfer::RejectMember,
    };

    const MEMBER_A: &str = "memberA";
    const MEMBER_B: &str = "memberB";
    const MEMBER_EX: &str = "ex";

    async fn setup() -> (MemberRepository, TemplateTransferService) {
        let pool = test_pool().await;
        let repository = MemberRepository::new(pool.clone());
        let service = TemplateTransferService::new(
            TransactionManager::new(pool),
            Arc::new(RejectMember::new(MEMBER_EX)),
        );
        (repository, service)
    }

    #[tokio::test]
    async fn account_transfer() {
        let (repository, service) = setup().await;
        repository.save(&Member::new(MEMBER_A, 10000)).await.unwrap();
        repository.save(&Member::new(MEMBER_B, 10000)).await.unwrap();

        service
            .account_transfer(MEMBER_A, MEMBER_B, 2000)
            .await
            .unwrap();

        assert_eq!(repository.find_by_id(MEMBER_A).await.unwrap().money, 8000);
        assert_eq!(repository.find_by_id(MEMBER_B).await.unwrap().money, 12000);
    }

    #[tokio::test]
    async fn account_transfer_ex() {
        let (repository, service) = setup().await;
        repository.save(&Member::new(MEMBER_A, 10000)).await.unwrap();
        repository.save(&Member::new(MEMBER_EX, 10000)).await.unwrap();

        let err = service
            .account_transfer(MEMBER_A, MEMBER_EX, 2000)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TransferFailed(_)));
        assert!(matches!(err.root_cause(), AppError::TransferRejected(_)));
        assert_eq!(repository.find_by_id(MEMBER_A).await.unwrap().money, 10000);
        assert_eq!(repository.find_by_id(MEMBER_EX).await.unwrap().money, 10000);
    }

    #[tokio::test]
    async fn consecutive_transfers_accumulate() {
        let (repository, service) = setup().await;
        repository.save(&Member::new(MEMBER_A, 10000)).await.unwrap();
        repository.save(&Member::new(MEMBER_B, 10000)).await.unwrap();

        service.account_transfer(MEMBER_A, MEMBER_B, 2000).await.unwrap();
        service.account_transfer(MEMBER_B, MEMBER_A, 500).await.unwrap();

        assert_eq!(repository.find_by_id(MEMBER_A).await.unwrap().money, 8500);
        assert_eq!(repository.find_by_id(MEMBER_B).await.unwrap().money, 11500);
    }

    #[tokio::test]
    async fn missing_destination_leaves_source_untouched() {
        let (repository, service) = setup().await;
        repository.save(&Member::new(MEMBER_A, 10000)).await.unwrap();

        let err = service
            .account_transfer(MEMBER_A, MEMBER_B, 2000)
            .await
            .unwrap_err();

        assert!(matches!(err.root_cause(), AppError::MemberNotFound(id) if id == MEMBER_B));
        assert_eq!(repository.find_by_id(MEMBER_A).await.unwrap().money, 10000);
    }

    #[tokio::test]
    async fn credit_overflow_rolls_back_the_debit() {
        let (repository, service) = setup().await;
        repository.save(&Member::new(MEMBER_A, 10)).await.unwrap();
        repository.save(&Member::new(MEMBER_B, i64::MAX)).await.unwrap();

        let err = service
            .account_transfer(MEMBER_A, MEMBER_B, 5)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TransferFailed(_)));
        assert!(matches!(err.root_cause(), AppError::InvalidRequest(_)));
        assert_eq!(repository.find_by_id(MEMBER_A).await.unwrap().money, 10);
        assert_eq!(repository.find_by_id(MEMBER_B).await.unwrap().money, i64::MAX);
    }
}
