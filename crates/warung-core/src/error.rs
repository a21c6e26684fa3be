//! # Error Types
//!
//! Domain-specific error types for warung-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warung-core errors (this file)                                        │
//! │  ├── ValidationError  - checkout / payment input rejections            │
//! │  └── LedgerError      - settlement rule violations                     │
//! │                                                                         │
//! │  warung-db errors (separate crate)                                     │
//! │  └── DbError          - persistence failures, write conflicts          │
//! │                                                                         │
//! │  warung-engine errors (service layer)                                  │
//! │  └── EngineError      - what callers of the three engines see          │
//! │                                                                         │
//! │  Flow: ValidationError / LedgerError → EngineError → ApiResponse       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are caller mistakes and are never retried. Ledger
//! errors carry enough context for the caller to correct the request (an
//! overpayment reports the actual remaining balance).

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures, surfaced before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Checkout submitted with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Credit sale submitted without a customer to owe it.
    #[error("credit sale requires a customer")]
    MissingCustomerForCredit,

    /// Line quantity must be at least 1.
    #[error("quantity must be positive, got {quantity}")]
    NonPositiveQuantity { quantity: i64 },

    /// Unit prices may be zero (giveaways) but never negative.
    #[error("price must not be negative, got {price}")]
    NegativePrice { price: i64 },

    /// Installment payments must move the balance.
    #[error("payment amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },

    /// Cart exceeded [`crate::MAX_CART_LINES`].
    #[error("cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeded [`crate::MAX_LINE_QUANTITY`].
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },
}

// =============================================================================
// Ledger Error
// =============================================================================

/// Settlement rule violations on the receivables side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Payment exceeds what is still owed.
    ///
    /// Carries the current remaining balance so the caller can resubmit a
    /// valid amount without another round trip.
    #[error("payment exceeds remaining balance of {remaining}")]
    Overpayment { remaining: i64 },
}

/// Convenience alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::EmptyCart.to_string(), "cart is empty");
        assert_eq!(
            ValidationError::NonPositiveAmount { amount: -500 }.to_string(),
            "payment amount must be positive, got -500"
        );
        assert_eq!(
            LedgerError::Overpayment { remaining: 60_000 }.to_string(),
            "payment exceeds remaining balance of 60000"
        );
    }
}
