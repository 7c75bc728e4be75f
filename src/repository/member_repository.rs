//! Data access for the `member` table.
//!
//! Two layers live here:
//! - Free functions that run one statement on a connection the caller owns.
//!   The caller may pass the pool, a pooled connection or an open
//!   transaction. These functions never release what they were given.
//! - `MemberRepository`, which borrows a pooled connection per call and hands
//!   it back on every exit path.
//!
//! All database errors go through [`translate`], so callers only ever see
//! `AppError`.

use sqlx::{Executor, Sqlite, pool::PoolConnection};

use crate::{
    db::DbPool,
    error::{AppError, translate},
    models::member::Member,
};

/// Insert a new member.
///
/// # Errors
///
/// - `DuplicateKey`: A member with the same id already exists
/// - `Database`: Database error occurred
pub async fn save<'e, E>(executor: E, member: &Member) -> Result<Member, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO member (member_id, money) VALUES (?, ?)")
        .bind(&member.member_id)
        .bind(member.money)
        .execute(executor)
        .await
        .map_err(|err| translate("save", &member.member_id, err))?;

    Ok(member.clone())
}

/// Look up a member by id.
///
/// # Errors
///
/// - `MemberNotFound`: No row has this id
/// - `Database`: Database error occurred
pub async fn find_by_id<'e, E>(executor: E, member_id: &str) -> Result<Member, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Member>("SELECT member_id, money FROM member WHERE member_id = ?")
        .bind(member_id)
        .fetch_optional(executor)
        .await
        .map_err(|err| translate("findById", member_id, err))?
        .ok_or_else(|| AppError::MemberNotFound(member_id.to_string()))
}

/// All members, ordered by id.
pub async fn find_all<'e, E>(executor: E) -> Result<Vec<Member>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Member>("SELECT member_id, money FROM member ORDER BY member_id")
        .fetch_all(executor)
        .await
        .map_err(|err| translate("findAll", "*", err))
}

/// Replace a member's balance.
///
/// # Errors
///
/// - `MemberNotFound`: No row has this id
/// - `Database`: Database error occurred
pub async fn update<'e, E>(executor: E, member_id: &str, money: i64) -> Result<(), AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result_size = sqlx::query("UPDATE member SET money = ? WHERE member_id = ?")
        .bind(money)
        .bind(member_id)
        .execute(executor)
        .await
        .map_err(|err| translate("update", member_id, err))?
        .rows_affected();

    tracing::info!(member_id, result_size, "member updated");

    if result_size == 0 {
        return Err(AppError::MemberNotFound(member_id.to_string()));
    }

    Ok(())
}

/// Remove a member.
///
/// # Errors
///
/// - `MemberNotFound`: No row has this id
/// - `Database`: Database error occurred
pub async fn delete<'e, E>(executor: E, member_id: &str) -> Result<(), AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let deleted = sqlx::query("DELETE FROM member WHERE member_id = ?")
        .bind(member_id)
        .execute(executor)
        .await
        .map_err(|err| translate("delete", member_id, err))?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::MemberNotFound(member_id.to_string()));
    }

    Ok(())
}

/// Pool-backed member repository.
///
/// Every method borrows one connection from the pool for the duration of the
/// statement. The connection goes back to the pool when the guard drops,
/// whether the statement succeeded or not.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: DbPool,
}

impl MemberRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, member: &Member) -> Result<Member, AppError> {
        let mut conn = self.get_connection().await?;
        let result = save(&mut *conn, member).await;
        self.release(conn);
        result
    }

    pub async fn find_by_id(&self, member_id: &str) -> Result<Member, AppError> {
        let mut conn = self.get_connection().await?;
        let result = find_by_id(&mut *conn, member_id).await;
        self.release(conn);
        result
    }

    pub async fn find_all(&self) -> Result<Vec<Member>, AppError> {
        let mut conn = self.get_connection().await?;
        let result = find_all(&mut *conn).await;
        self.release(conn);
        result
    }

    pub async fn update(&self, member_id: &str, money: i64) -> Result<(), AppError> {
        let mut conn = self.get_connection().await?;
        let result = update(&mut *conn, member_id, money).await;
        self.release(conn);
        result
    }

    pub async fn delete(&self, member_id: &str) -> Result<(), AppError> {
        let mut conn = self.get_connection().await?;
        let result = delete(&mut *conn, member_id).await;
        self.release(conn);
        result
    }

    async fn get_connection(&self) -> Result<PoolConnection<Sqlite>, AppError> {
        let conn = self.pool.acquire().await?;
        tracing::debug!(
            idle = self.pool.num_idle(),
            size = self.pool.size(),
            "get connection"
        );
        Ok(conn)
    }

    fn release(&self, conn: PoolConnection<Sqlite>) {
        drop(conn);
        tracing::debug!(idle = self.pool.num_idle(), "connection released");
    }
}
