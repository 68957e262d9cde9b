//! Batch summary, derived once after every task has settled.

use crate::account::AccountId;
use crate::outcome::{VerificationOutcome, VerificationResult};
use serde::{Deserialize, Serialize};

/// Aggregate counts for a run plus the accounts that came up short.
///
/// Derived by a single pass over the results in original input order, so
/// `missing_accounts` is deterministic regardless of task completion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub found_count: usize,
    pub not_found_count: usize,
    pub error_count: usize,
    /// Accounts whose outcome was NotFound or Error, in input order.
    pub missing_accounts: Vec<AccountId>,
}

impl Summary {
    /// Aggregate settled results. `results` must be in input order.
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            found_count: 0,
            not_found_count: 0,
            error_count: 0,
            missing_accounts: Vec::new(),
        };
        for result in results {
            match &result.outcome {
                VerificationOutcome::Found(_) => summary.found_count += 1,
                VerificationOutcome::NotFound => {
                    summary.not_found_count += 1;
                    summary.missing_accounts.push(result.account.clone());
                }
                VerificationOutcome::Error { .. } => {
                    summary.error_count += 1;
                    summary.missing_accounts.push(result.account.clone());
                }
            }
        }
        summary
    }
}
