//! # Engine Error Type
//!
//! What callers of the three engines see.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Validation   caller mistake, visible immediately, never retried       │
//! │  Overpayment  carries the actual remaining so a valid amount can be    │
//! │               resubmitted without another read                         │
//! │  SaleNotFound unknown sale id                                          │
//! │  Conflict     settlement retries exhausted; safe to retry the call     │
//! │  Persistence  the write failed and was rolled back in full             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation returns these as typed results; nothing is thrown as a
//! generic fault and no failed write is silently swallowed.

use thiserror::Error;

use warung_core::settlement::InstallmentError;
use warung_core::{LedgerError, ValidationError};
use warung_db::DbError;

/// Service-layer errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Payment exceeds the sale's current remaining balance.
    #[error("payment exceeds remaining balance of {remaining}")]
    Overpayment { remaining: i64 },

    /// Unknown sale id.
    #[error("sale not found: {0}")]
    SaleNotFound(String),

    /// Concurrent settlements kept winning the race; the sale's balance is
    /// consistent, this payment just never landed. Retryable.
    #[error("payment on sale {sale_id} conflicted {attempts} times, giving up")]
    Conflict { sale_id: String, attempts: usize },

    /// The store failed. Any partial multi-row write was rolled back before
    /// this surfaced.
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl From<InstallmentError> for EngineError {
    fn from(err: InstallmentError) -> Self {
        match err {
            InstallmentError::Validation(e) => EngineError::Validation(e),
            InstallmentError::Ledger(LedgerError::Overpayment { remaining }) => {
                EngineError::Overpayment { remaining }
            }
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_refusals_map_to_engine_errors() {
        let overpay: EngineError =
            InstallmentError::Ledger(LedgerError::Overpayment { remaining: 60_000 }).into();
        assert!(matches!(
            overpay,
            EngineError::Overpayment { remaining: 60_000 }
        ));

        let bad_amount: EngineError =
            InstallmentError::Validation(ValidationError::NonPositiveAmount { amount: 0 }).into();
        assert!(matches!(bad_amount, EngineError::Validation(_)));
    }
}
