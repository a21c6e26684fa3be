//! # Checkout
//!
//! Cart validation and totals for recording a sale.
//!
//! ## Request-Local Carts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Data Flow                                 │
//! │                                                                         │
//! │  Caller assembles cart lines (product, qty, unit price)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutRequest ← one explicit value, no shared mutable cart          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate() ── EmptyCart? MissingCustomerForCredit? bad line?          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total() = Σ quantity * price_at_sale                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  initial_settlement() ── cash is born settled, credit born owing       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleEngine persists header + lines atomically                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is an explicit parameter of the request, never process-wide
//! state. Prices arrive as the caller snapshotted them; this layer does not
//! re-read the catalog.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{PaymentMethod, PaymentStatus};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of a checkout: what is being bought, how many, at what price.
///
/// `price_at_sale` becomes the frozen snapshot on the persisted line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in rupiah, as quoted to the buyer.
    pub price_at_sale: i64,
}

impl CartLine {
    /// Line total: `quantity * price_at_sale`.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.price_at_sale).multiply_quantity(self.quantity)
    }

    fn validate(&self) -> ValidationResult<()> {
        if self.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity {
                quantity: self.quantity,
            });
        }
        if self.quantity > MAX_LINE_QUANTITY {
            return Err(ValidationError::QuantityTooLarge {
                requested: self.quantity,
                max: MAX_LINE_QUANTITY,
            });
        }
        if self.price_at_sale < 0 {
            return Err(ValidationError::NegativePrice {
                price: self.price_at_sale,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Checkout Request
// =============================================================================

/// A complete checkout: cart lines plus how it will be paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub lines: Vec<CartLine>,
    pub payment_method: PaymentMethod,
    /// Required for credit sales; ignored-but-allowed for cash.
    pub customer_id: Option<String>,
}

impl CheckoutRequest {
    /// Validates the request without computing anything.
    ///
    /// ## Rules
    /// - at least one line, at most [`MAX_CART_LINES`]
    /// - every quantity positive and within [`MAX_LINE_QUANTITY`]
    /// - no negative unit price (zero is allowed: giveaways happen)
    /// - a credit sale names the customer who owes it
    pub fn validate(&self) -> ValidationResult<()> {
        if self.lines.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        if self.lines.len() > MAX_CART_LINES {
            return Err(ValidationError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        if self.payment_method == PaymentMethod::Credit && self.customer_id.is_none() {
            return Err(ValidationError::MissingCustomerForCredit);
        }
        for line in &self.lines {
            line.validate()?;
        }
        Ok(())
    }

    /// Validates and returns the sale total.
    pub fn total(&self) -> ValidationResult<Money> {
        self.validate()?;
        Ok(self.lines.iter().map(CartLine::total).sum())
    }
}

// =============================================================================
// Initial Settlement
// =============================================================================

/// Settlement state a sale is born with.
///
/// - Cash: settled on the spot, nothing remains, and no payment event will
///   ever be attached to it.
/// - Credit: the full total remains outstanding until installments clear it.
#[inline]
pub fn initial_settlement(method: PaymentMethod, total: Money) -> (PaymentStatus, Money) {
    match method {
        PaymentMethod::Cash => (PaymentStatus::Paid, Money::zero()),
        PaymentMethod::Credit => (PaymentStatus::Unpaid, total),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: &str, qty: i64, price: i64) -> CartLine {
        CartLine {
            product_id: product.into(),
            quantity: qty,
            price_at_sale: price,
        }
    }

    #[test]
    fn test_cash_cart_total() {
        // Two lines at Rp 10.000 plus one at Rp 5.000
        let request = CheckoutRequest {
            lines: vec![line("p-1", 2, 10_000), line("p-2", 1, 5_000)],
            payment_method: PaymentMethod::Cash,
            customer_id: None,
        };

        assert_eq!(request.total().unwrap().rupiah(), 25_000);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let request = CheckoutRequest {
            lines: vec![],
            payment_method: PaymentMethod::Cash,
            customer_id: None,
        };

        assert_eq!(request.validate(), Err(ValidationError::EmptyCart));
    }

    #[test]
    fn test_credit_requires_customer() {
        let request = CheckoutRequest {
            lines: vec![line("p-1", 1, 30_000)],
            payment_method: PaymentMethod::Credit,
            customer_id: None,
        };

        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingCustomerForCredit)
        );

        let with_customer = CheckoutRequest {
            customer_id: Some("c-1".into()),
            ..request
        };
        assert!(with_customer.validate().is_ok());
    }

    #[test]
    fn test_bad_lines_rejected() {
        let zero_qty = CheckoutRequest {
            lines: vec![line("p-1", 0, 1_000)],
            payment_method: PaymentMethod::Cash,
            customer_id: None,
        };
        assert_eq!(
            zero_qty.validate(),
            Err(ValidationError::NonPositiveQuantity { quantity: 0 })
        );

        let negative_price = CheckoutRequest {
            lines: vec![line("p-1", 1, -500)],
            payment_method: PaymentMethod::Cash,
            customer_id: None,
        };
        assert_eq!(
            negative_price.validate(),
            Err(ValidationError::NegativePrice { price: -500 })
        );
    }

    #[test]
    fn test_oversized_cart_rejected() {
        let request = CheckoutRequest {
            lines: (0..=MAX_CART_LINES as i64)
                .map(|i| line(&format!("p-{i}"), 1, 100))
                .collect(),
            payment_method: PaymentMethod::Cash,
            customer_id: None,
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::CartTooLarge {
                max: MAX_CART_LINES
            })
        );
    }

    #[test]
    fn test_initial_settlement() {
        let total = Money::from_rupiah(100_000);

        let (status, remaining) = initial_settlement(PaymentMethod::Cash, total);
        assert_eq!(status, PaymentStatus::Paid);
        assert_eq!(remaining, Money::zero());

        let (status, remaining) = initial_settlement(PaymentMethod::Credit, total);
        assert_eq!(status, PaymentStatus::Unpaid);
        assert_eq!(remaining, total);
    }
}
