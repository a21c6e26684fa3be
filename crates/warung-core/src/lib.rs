//! # warung-core: Pure Business Logic for Warung POS
//!
//! This crate is the **heart** of the ledger. It contains all business rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Warung POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 warung-engine (Service Layer)                   │   │
//! │  │     SaleEngine ── ReceivablesLedger ── AggregationEngine        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ warung-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │   types   │  │   money   │  │  checkout │  │ settlement │  │   │
//! │  │   │   Sale    │  │   Money   │  │  CartLine │  │ installment│  │   │
//! │  │   │  Payment  │  │  rupiah   │  │  totals   │  │    math    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   warung-db (Database Layer)                    │   │
//! │  │             SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, PaymentEvent, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Cart validation and sale construction
//! - [`settlement`] - Installment math for credit sales
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, always
//! 2. **No I/O**: database and network access is FORBIDDEN here
//! 3. **Integer Money**: every amount is whole rupiah in an i64
//! 4. **Explicit Errors**: all failures are typed, never strings or panics
//!
//! ## Example
//!
//! ```rust
//! use warung_core::checkout::{CartLine, CheckoutRequest};
//! use warung_core::types::PaymentMethod;
//!
//! let request = CheckoutRequest {
//!     lines: vec![
//!         CartLine { product_id: "p-1".into(), quantity: 2, price_at_sale: 10_000 },
//!         CartLine { product_id: "p-2".into(), quantity: 1, price_at_sale: 5_000 },
//!     ],
//!     payment_method: PaymentMethod::Cash,
//!     customer_id: None,
//! };
//!
//! assert_eq!(request.total().unwrap().rupiah(), 25_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod settlement;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use warung_core::Money` instead of
// `use warung_core::money::Money`

pub use checkout::{CartLine, CheckoutRequest};
pub use error::{LedgerError, ValidationError};
pub use money::Money;
pub use settlement::{apply_installment, InstallmentError, PaymentOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single checkout.
///
/// Prevents runaway carts and keeps a single transaction a reasonable size.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against fat-finger entry (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
