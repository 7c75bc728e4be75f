//! Transaction boundary abstractions.
//!
//! - `TransactionManager`: begins, commits and rolls back transactions on
//!   pooled connections, so services never touch the pool themselves
//! - `TransactionStatus`: one open transaction, handed to business logic
//! - `TransactionTemplate`: runs a callback inside a transaction and decides
//!   commit or rollback from its result

use std::{future::Future, pin::Pin};

use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::{
    db::{BEGIN_IMMEDIATE, DbPool},
    error::AppError,
};

/// Boxed future returned by template callbacks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An open transaction and its completion flags.
///
/// The underlying connection stays borrowed from the pool until the status is
/// passed to `commit` or `rollback`. Dropping a status without doing either
/// rolls the transaction back.
pub struct TransactionStatus {
    tx: Transaction<'static, Sqlite>,
    rollback_only: bool,
}

impl TransactionStatus {
    /// Connection the transaction runs on.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    /// Mark the transaction so that a later commit rolls back instead.
    pub fn set_rollback_only(&mut self) {
        self.rollback_only = true;
    }

    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only
    }
}

/// Begins and completes transactions on connections from the pool.
#[derive(Debug, Clone)]
pub struct TransactionManager {
    pool: DbPool,
}

impl TransactionManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Begin a new transaction on a pooled connection.
    ///
    /// The write lock is taken up front, so two transfers never both hold a
    /// read lock and then deadlock upgrading it.
    pub async fn get_transaction(&self) -> Result<TransactionStatus, AppError> {
        let tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;
        tracing::debug!("transaction started");

        Ok(TransactionStatus {
            tx,
            rollback_only: false,
        })
    }

    /// Commit the transaction, or roll it back if it was marked rollback-only.
    ///
    /// Either way the connection goes back to the pool.
    pub async fn commit(&self, status: TransactionStatus) -> Result<(), AppError> {
        if status.is_rollback_only() {
            tracing::debug!("transaction marked rollback-only, rolling back");
            return self.rollback(status).await;
        }

        status.tx.commit().await?;
        tracing::debug!("transaction committed");
        Ok(())
    }

    /// Roll back every change made in the transaction.
    pub async fn rollback(&self, status: TransactionStatus) -> Result<(), AppError> {
        status.tx.rollback().await?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }
}

/// Runs callbacks inside transactions from a `TransactionManager`.
#[derive(Debug, Clone)]
pub struct TransactionTemplate {
    manager: TransactionManager,
}

impl TransactionTemplate {
    pub fn new(manager: TransactionManager) -> Self {
        Self { manager }
    }

    /// Run `callback` in a new transaction.
    ///
    /// An `Ok` result is committed, unless the callback marked the status
    /// rollback-only. An `Err` result is rolled back and returned. A failure
    /// during that rollback is logged and the callback's error is kept.
    pub async fn execute<T, F>(&self, callback: F) -> Result<T, AppError>
    where
        F: for<'c> FnOnce(&'c mut TransactionStatus) -> BoxFuture<'c, Result<T, AppError>>,
    {
        let mut status = self.manager.get_transaction().await?;

        match callback(&mut status).await {
            Ok(value) => {
                self.manager.commit(status).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.manager.rollback(status).await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}
