//! # Settlement
//!
//! Pure installment math for credit sales.
//!
//! The receivables ledger reads a sale's current remaining balance, runs it
//! through [`apply_installment`], and persists the outcome together with the
//! payment event in one transaction. Keeping the arithmetic here means the
//! invariant (`remaining == total − Σ payments`, `Paid ⟺ remaining == 0`)
//! is enforced by a function with no I/O to mock.

use crate::error::{LedgerError, ValidationError};
use crate::money::Money;
use crate::types::PaymentStatus;

// =============================================================================
// Payment Outcome
// =============================================================================

/// Result of applying one installment to a remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub new_remaining: Money,
    pub new_status: PaymentStatus,
}

/// Applies an installment to the current remaining balance.
///
/// ## Rules
/// - `amount` must be positive ([`ValidationError::NonPositiveAmount`])
/// - `amount` must not exceed `remaining`; otherwise the caller gets
///   [`LedgerError::Overpayment`] carrying the actual remaining so it can
///   resubmit a valid figure
/// - the balance clamps at zero and the sale flips to `Paid` exactly when
///   nothing is left
///
/// A cash sale has `remaining == 0` from birth, so any payment against it
/// falls out as `Overpayment { remaining: 0 }` with no special casing.
///
/// ## Example
/// ```rust
/// use warung_core::money::Money;
/// use warung_core::settlement::apply_installment;
/// use warung_core::types::PaymentStatus;
///
/// let outcome =
///     apply_installment(Money::from_rupiah(100_000), Money::from_rupiah(40_000)).unwrap();
/// assert_eq!(outcome.new_remaining.rupiah(), 60_000);
/// assert_eq!(outcome.new_status, PaymentStatus::Unpaid);
/// ```
pub fn apply_installment(
    remaining: Money,
    amount: Money,
) -> Result<PaymentOutcome, InstallmentError> {
    if !amount.is_positive() {
        return Err(InstallmentError::Validation(
            ValidationError::NonPositiveAmount {
                amount: amount.rupiah(),
            },
        ));
    }

    if amount > remaining {
        return Err(InstallmentError::Ledger(LedgerError::Overpayment {
            remaining: remaining.rupiah(),
        }));
    }

    let new_remaining = remaining.saturating_sub(amount);
    let new_status = if new_remaining.is_zero() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    };

    Ok(PaymentOutcome {
        new_remaining,
        new_status,
    })
}

/// Why an installment was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstallmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// =============================================================================
// Unit Tests
// =============================================================================
