//! Report types handed to the presentation layer
//!
//! Everything in this module is already rounded to two decimals and carries
//! the display attributes of the members involved. Serialised field names
//! follow the camelCase output contract (`userId`, `userBalances`, ...).

use super::member::{Member, MemberId};
use super::transaction::GroupId;
use rust_decimal::Decimal;
use serde::Serialize;

/// Display reference to a member inside a settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRef {
    pub user_id: MemberId,
    pub name: String,
    pub avatar: String,
}

impl From<&Member> for MemberRef {
    fn from(member: &Member) -> Self {
        MemberRef {
            user_id: member.id.clone(),
            name: member.name.clone(),
            avatar: member.avatar.clone(),
        }
    }
}

/// Rounded balance of one member with display attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBalance {
    pub user_id: MemberId,
    pub name: String,
    pub email: String,
    pub avatar: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub share: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Settlement with display references for both parties
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementView {
    pub from: MemberRef,
    pub to: MemberRef,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Totals over the transactions considered for a group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Sum of all expense amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,

    /// Sum of all income amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,

    /// `total_expense - total_income`
    #[serde(with = "rust_decimal::serde::float")]
    pub net_amount: Decimal,

    /// Number of transactions considered
    pub count: usize,
}

/// Complete settlement report for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub group: GroupId,
    pub user_balances: Vec<UserBalance>,
    pub settlements: Vec<SettlementView>,
    pub summary: GroupSummary,
}
