//! Member data model and API request types.
//!
//! This module defines:
//! - `Member`: Database entity representing one row of the `member` table
//! - `SaveMemberRequest`, `UpdateMemberRequest`: Request bodies for member endpoints
//! - `TransferRequest`, `TransferResponse`: Request and response bodies for transfers

use serde::{Deserialize, Serialize};

/// Represents a member record from the database.
///
/// # Database Table
///
/// Maps to the `member` table. The balance is a plain integer and may go
/// negative; nothing here checks that a transfer is covered.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Member {
    /// Externally assigned, unique identifier
    pub member_id: String,

    /// Current balance
    pub money: i64,
}

impl Member {
    pub fn new(member_id: impl Into<String>, money: i64) -> Self {
        Self {
            member_id: member_id.into(),
            money,
        }
    }
}

/// Request body for saving a new member.
///
/// # JSON Example
///
/// ```json
/// {
///   "member_id": "memberA",
///   "money": 10000
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct SaveMemberRequest {
    pub member_id: String,

    /// Opening balance (defaults to 0 if not provided)
    #[serde(default)]
    pub money: i64,
}

impl From<SaveMemberRequest> for Member {
    fn from(request: SaveMemberRequest) -> Self {
        Member::new(request.member_id, request.money)
    }
}

/// Request body for replacing a member's balance.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub money: i64,
}

/// Request body for a transfer.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_id": "memberA",
///   "to_id": "memberB",
///   "amount": 2000
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_id: String,
    pub to_id: String,
    pub amount: i64,
}

/// Balances of both members once a transfer has been committed.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    pub from: Member,
    pub to: Member,
}
