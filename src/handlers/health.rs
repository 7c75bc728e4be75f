//! Liveness endpoint reporting database reachability and pool occupancy.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{db::DbPool, error::AppError};

/// Connection pool occupancy at the time of the check.
#[derive(Debug, Serialize)]
pub struct PoolStatus {
    /// Open connections, whether idle or borrowed
    pub size: u32,
    pub idle: usize,
    pub max_connections: u32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub pool: PoolStatus,
}

/// `GET /health`
///
/// Runs `SELECT 1` on a pooled connection, then reports the pool as it
/// stands once that connection is back.
///
/// ```json
/// {
///   "status": "healthy",
///   "pool": { "size": 1, "idle": 1, "max_connections": 5 }
/// }
/// ```
///
/// An unreachable database yields the standard error response.
pub async fn health_check(State(pool): State<DbPool>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy",
        pool: PoolStatus {
            size: pool.size(),
            idle: pool.num_idle(),
            max_connections: pool.options().get_max_connections(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn reports_pool_occupancy() {
        let pool = test_pool().await;

        let Json(health) = health_check(State(pool)).await.unwrap();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.pool.max_connections, 1);
        assert_eq!(health.pool.size, 1);
        assert!(health.pool.idle <= 1);
    }
}
