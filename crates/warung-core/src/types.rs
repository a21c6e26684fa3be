//! # Domain Types
//!
//! Core domain types for the sale/receivables ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  PaymentEvent   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sale_price     │   │  total_amount   │   │  sale_id (FK)   │       │
//! │  │  cost_price     │   │  remaining      │   │  amount         │       │
//! │  │  stock_qty      │   │  method/status  │   │  created_at     │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                        ┌────────┴────────┐                              │
//! │                        │  SaleLineItem   │  price frozen at sale        │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale header and its line items are written together, once, and never
//! mutated afterwards; the single exception is the receivables ledger
//! updating `remaining_amount` / `payment_status` on credit sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale is settled: immediately (cash) or deferred (credit).
///
/// A credit sale is a receivable: it stays on the books until installments
/// bring the remaining balance to zero.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in full at the till.
    Cash,
    /// Deferred payment, tracked per customer until fully paid.
    Credit,
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement state of a sale.
///
/// Holds the invariant `Paid ⟺ remaining_amount == 0` at all times.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing is owed.
    Paid,
    /// A balance remains outstanding.
    Unpaid,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// The catalog is owned and mutated elsewhere; the ledger only reads it.
/// `cost_price` feeds profit reports and is read live at report time, so
/// editing it later shifts historical profit figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Selling price in rupiah.
    pub sale_price: i64,

    /// Purchase cost in rupiah (for margin calculations).
    pub cost_price: i64,

    /// Stock on hand. Informational to this core; never decremented here.
    pub stock_qty: i64,

    /// Soft-delete flag.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Selling price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_rupiah(self.sale_price)
    }

    /// Purchase cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_rupiah(self.cost_price)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Someone who can owe the warung money.
///
/// Every credit sale references a customer; cash sales are anonymous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// One checkout event: the header of an atomically-written sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,

    /// Present iff this is a credit sale.
    pub customer_id: Option<String>,

    /// Sum of `quantity * price_at_sale` over this sale's line items.
    pub total_amount: i64,

    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    /// Outstanding balance. Zero for cash sales from birth; counts down on
    /// credit sales as installments land.
    pub remaining_amount: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.total_amount)
    }

    /// Outstanding balance as Money.
    #[inline]
    pub fn remaining(&self) -> Money {
        Money::from_rupiah(self.remaining_amount)
    }

    /// True once nothing is owed.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// A credit sale still carrying a balance.
    ///
    /// These are listed in reports but excluded from realized revenue until
    /// paid off.
    #[inline]
    pub fn is_unrealized(&self) -> bool {
        self.payment_method == PaymentMethod::Credit && self.payment_status == PaymentStatus::Unpaid
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line in a sale.
///
/// Uses the snapshot pattern: `price_at_sale` is frozen at checkout and
/// stays correct no matter how the catalog price changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in rupiah at the moment of sale (frozen).
    pub price_at_sale: i64,
    /// `quantity * price_at_sale`, stored for cheap report sums.
    pub line_total: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_rupiah(self.price_at_sale)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.line_total)
    }
}

// =============================================================================
// Payment Event
// =============================================================================

/// One installment against a credit sale.
///
/// Append-only: rows are never updated or deleted. The full event history is
/// the audit trail backing the remaining-balance invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentEvent {
    pub id: String,
    pub sale_id: String,
    /// Amount received, in rupiah. Always positive.
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl PaymentEvent {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_rupiah(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
