//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! The transfer logic is written once in [`transfer`]; the three transfer
//! services differ only in who opens and closes the transaction around it.

pub mod managed_transfer_service;
pub mod manual_transfer_service;
pub mod template_transfer_service;
pub mod transaction_manager;
pub mod transfer;

use std::sync::Arc;

use crate::{config::TransferStrategy, db::DbPool, error::AppError};

pub use managed_transfer_service::ManagedTransferService;
pub use manual_transfer_service::ManualTransferService;
pub use template_transfer_service::TemplateTransferService;
pub use transaction_manager::{TransactionManager, TransactionStatus, TransactionTemplate};
pub use transfer::{AcceptAll, DestinationGuard, RejectMember};

/// One of the transfer services, picked at startup.
#[derive(Clone)]
pub enum TransferService {
    Manual(ManualTransferService),
    Managed(ManagedTransferService),
    Template(TemplateTransferService),
}

impl TransferService {
    pub fn new(strategy: TransferStrategy, pool: DbPool, guard: Arc<dyn DestinationGuard>) -> Self {
        match strategy {
            TransferStrategy::Manual => {
                TransferService::Manual(ManualTransferService::new(pool, guard))
            }
            TransferStrategy::Managed => TransferService::Managed(ManagedTransferService::new(
                TransactionManager::new(pool),
                guard,
            )),
            TransferStrategy::Template => TransferService::Template(
                TemplateTransferService::new(TransactionManager::new(pool), guard),
            ),
        }
    }

    pub async fn account_transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: i64,
    ) -> Result<(), AppError> {
        match self {
            TransferService::Manual(service) => {
                service.account_transfer(from_id, to_id, amount).await
            }
            TransferService::Managed(service) => {
                service.account_transfer(from_id, to_id, amount).await
            }
            TransferService::Template(service) => {
                service.account_transfer(from_id, to_id, amount).await
            }
        }
    }
}
