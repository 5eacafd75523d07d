//! Balance bookkeeping for ledger transactions.
//!
//! A transaction is turned into postings, i.e. signed balance deltas per
//! account:
//!
//! | type     | `account`  | `to_account` |
//! |----------|------------|--------------|
//! | income   | + amount   |              |
//! | expense  | - amount   |              |
//! | transfer | - amount   | + amount     |
//!
//! Deleting a transaction applies its reversal. Editing applies the
//! reversal of the stored transaction and then the postings of the new one;
//! [`net_postings`] folds both into a single delta per account so each
//! account row is updated once.
//!
//! This module does no I/O. The transaction service locks the affected
//! rows and writes the netted deltas inside one database transaction.

use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{Transaction, TransactionRequest, TransactionType},
    services::validation,
};

/// Signed change to one account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub account_id: Uuid,
    pub delta_cents: i64,
}

/// The balance-relevant part of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub kind: TransactionType,
    pub account_id: Uuid,
    pub to_account_id: Option<Uuid>,
    pub amount_cents: i64,
}

impl Entry {
    /// Rebuild the entry of a stored transaction.
    pub fn from_stored(transaction: &Transaction) -> Result<Self, AppError> {
        let kind = transaction
            .transaction_type
            .parse::<TransactionType>()
            .map_err(AppError::Internal)?;

        Ok(Self {
            kind,
            account_id: transaction.account_id,
            to_account_id: transaction.to_account_id,
            amount_cents: transaction.amount_cents,
        })
    }

    pub fn postings(&self) -> Vec<Posting> {
        let amount = self.amount_cents;
        match self.kind {
            TransactionType::Income => vec![Posting {
                account_id: self.account_id,
                delta_cents: amount,
            }],
            TransactionType::Expense => vec![Posting {
                account_id: self.account_id,
                delta_cents: -amount,
            }],
            TransactionType::Transfer => {
                let mut postings = vec![Posting {
                    account_id: self.account_id,
                    delta_cents: -amount,
                }];
                // A stored transfer loses its destination when that account
                // is deleted; only the source side is left to undo.
                if let Some(to) = self.to_account_id {
                    postings.push(Posting {
                        account_id: to,
                        delta_cents: amount,
                    });
                }
                postings
            }
        }
    }

    pub fn reversal(&self) -> Vec<Posting> {
        self.postings()
            .into_iter()
            .map(|p| Posting {
                account_id: p.account_id,
                delta_cents: -p.delta_cents,
            })
            .collect()
    }

    /// Every account this entry touches.
    pub fn accounts(&self) -> Vec<Uuid> {
        let mut ids = vec![self.account_id];
        ids.extend(self.to_account_id);
        ids
    }
}

/// Sum postings per account. Ordered by account id, which is also the
/// order rows are locked in.
///
/// A sum that leaves the `i64` range is rejected rather than wrapped.
pub fn net_postings(
    postings: impl IntoIterator<Item = Posting>,
) -> Result<BTreeMap<Uuid, i64>, AppError> {
    let mut net = BTreeMap::new();
    for posting in postings {
        let total = net.entry(posting.account_id).or_insert(0i64);
        *total = total
            .checked_add(posting.delta_cents)
            .ok_or_else(|| AppError::invalid("Amount is out of range."))?;
    }
    Ok(net)
}

/// Postings for an edit: undo `old`, then apply `new`.
pub fn edit_postings(old: &Entry, new: &Entry) -> Result<BTreeMap<Uuid, i64>, AppError> {
    net_postings(old.reversal().into_iter().chain(new.postings()))
}

/// A validated transaction request with irrelevant fields cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub entry: Entry,
    pub description: String,
    pub transaction_date: chrono::NaiveDate,
    pub expense_category_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
}

impl Draft {
    /// Checks that need no database access.
    ///
    /// The "at least two accounts" and "same account" transfer checks need
    /// the caller's account count first and live in the transaction service.
    pub fn from_request(request: TransactionRequest) -> Result<Self, AppError> {
        validation::validate_amount(request.amount_cents)?;

        let (expense_category_id, income_category_id, to_account_id) =
            match request.transaction_type {
                TransactionType::Income => (None, request.income_category_id, None),
                TransactionType::Expense => (request.expense_category_id, None, None),
                TransactionType::Transfer => {
                    let to = request.to_account_id.ok_or_else(|| {
                        AppError::invalid("Select a destination account for the transfer.")
                    })?;
                    (None, None, Some(to))
                }
            };

        Ok(Self {
            entry: Entry {
                kind: request.transaction_type,
                account_id: request.account_id,
                to_account_id,
                amount_cents: request.amount_cents,
            },
            description: request.description.trim().to_string(),
            transaction_date: request.transaction_date,
            expense_category_id,
            income_category_id,
        })
    }

    pub fn is_same_account_transfer(&self) -> bool {
        self.entry.to_account_id == Some(self.entry.account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn entry(kind: TransactionType, from: u128, to: Option<u128>, amount: i64) -> Entry {
        Entry {
            kind,
            account_id: id(from),
            to_account_id: to.map(id),
            amount_cents: amount,
        }
    }

    fn apply(balances: &mut HashMap<Uuid, i64>, net: &BTreeMap<Uuid, i64>) {
        for (account, delta) in net {
            *balances.entry(*account).or_insert(0) += delta;
        }
    }

    fn request(kind: TransactionType) -> TransactionRequest {
        TransactionRequest {
            transaction_type: kind,
            account_id: id(1),
            amount_cents: 500,
            description: "  lunch ".into(),
            transaction_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            expense_category_id: Some(id(10)),
            income_category_id: Some(id(20)),
            to_account_id: Some(id(2)),
        }
    }

    #[test]
    fn expense_decreases_the_account_balance() {
        let net =
            net_postings(entry(TransactionType::Expense, 1, None, 1_250).postings()).unwrap();
        let mut balances = HashMap::from([(id(1), 10_000)]);
        apply(&mut balances, &net);

        assert_eq!(balances[&id(1)], 8_750);
    }

    #[test]
    fn income_increases_the_account_balance() {
        let postings = entry(TransactionType::Income, 1, None, 300).postings();
        assert_eq!(
            postings,
            vec![Posting {
                account_id: id(1),
                delta_cents: 300
            }]
        );
    }

    #[test]
    fn transfer_moves_money_and_conserves_the_total() {
        let net =
            net_postings(entry(TransactionType::Transfer, 1, Some(2), 4_000).postings()).unwrap();
        let mut balances = HashMap::from([(id(1), 10_000), (id(2), 500)]);
        apply(&mut balances, &net);

        assert_eq!(balances[&id(1)], 6_000);
        assert_eq!(balances[&id(2)], 4_500);
        assert_eq!(balances.values().sum::<i64>(), 10_500);
    }

    #[test]
    fn delete_restores_previous_balances() {
        let e = entry(TransactionType::Transfer, 1, Some(2), 750);
        let mut balances = HashMap::from([(id(1), 1_000), (id(2), 0)]);
        apply(&mut balances, &net_postings(e.postings()).unwrap());
        apply(&mut balances, &net_postings(e.reversal()).unwrap());

        assert_eq!(balances[&id(1)], 1_000);
        assert_eq!(balances[&id(2)], 0);
    }

    #[test]
    fn edit_reverts_old_effect_before_applying_new_one() {
        let old = entry(TransactionType::Expense, 1, None, 2_000);
        let new = entry(TransactionType::Income, 1, None, 500);

        // +2000 to undo the expense, +500 for the income
        assert_eq!(
            edit_postings(&old, &new).unwrap(),
            BTreeMap::from([(id(1), 2_500)])
        );
    }

    #[test]
    fn edit_that_changes_accounts_touches_old_and_new_accounts() {
        let old = entry(TransactionType::Transfer, 1, Some(2), 1_000);
        let new = entry(TransactionType::Expense, 3, None, 1_000);
        let net = edit_postings(&old, &new).unwrap();

        assert_eq!(net[&id(1)], 1_000);
        assert_eq!(net[&id(2)], -1_000);
        assert_eq!(net[&id(3)], -1_000);
    }

    #[test]
    fn unchanged_edit_nets_to_zero() {
        let e = entry(TransactionType::Transfer, 1, Some(2), 1_000);
        assert!(edit_postings(&e, &e).unwrap().values().all(|d| *d == 0));
    }

    #[test]
    fn transfer_without_destination_only_touches_source() {
        let orphan = entry(TransactionType::Transfer, 1, None, 900);
        assert_eq!(
            net_postings(orphan.reversal()).unwrap(),
            BTreeMap::from([(id(1), 900)])
        );
    }

    #[test]
    fn edit_netting_that_overflows_is_rejected() {
        let old = entry(TransactionType::Income, 1, None, i64::MAX);
        let new = entry(TransactionType::Expense, 1, None, i64::MAX);

        let err = edit_postings(&old, &new).unwrap_err();
        assert_eq!(err.to_string(), "Amount is out of range.");
    }

    #[test]
    fn draft_rejects_amounts_at_the_upper_bound() {
        let mut large = request(TransactionType::Income);
        large.amount_cents = validation::MAX_AMOUNT_CENTS;
        assert!(Draft::from_request(large).is_err());

        let mut largest_allowed = request(TransactionType::Income);
        largest_allowed.amount_cents = validation::MAX_AMOUNT_CENTS - 1;
        assert!(Draft::from_request(largest_allowed).is_ok());
    }

    #[test]
    fn draft_keeps_only_fields_relevant_to_the_type() {
        let income = Draft::from_request(request(TransactionType::Income)).unwrap();
        assert_eq!(income.income_category_id, Some(id(20)));
        assert_eq!(income.expense_category_id, None);
        assert_eq!(income.entry.to_account_id, None);
        assert_eq!(income.description, "lunch");

        let transfer = Draft::from_request(request(TransactionType::Transfer)).unwrap();
        assert_eq!(transfer.entry.to_account_id, Some(id(2)));
        assert_eq!(transfer.expense_category_id, None);
        assert_eq!(transfer.income_category_id, None);
    }

    #[test]
    fn draft_rejects_non_positive_amounts_and_missing_destination() {
        let mut zero = request(TransactionType::Expense);
        zero.amount_cents = 0;
        assert!(Draft::from_request(zero).is_err());

        let mut no_destination = request(TransactionType::Transfer);
        no_destination.to_account_id = None;
        assert!(Draft::from_request(no_destination).is_err());
    }

    #[test]
    fn same_account_transfer_is_detected() {
        let mut same = request(TransactionType::Transfer);
        same.to_account_id = Some(id(1));
        assert!(Draft::from_request(same).unwrap().is_same_account_transfer());
    }
}
