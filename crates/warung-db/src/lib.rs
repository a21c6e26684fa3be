//! # warung-db: Database Layer for Warung POS
//!
//! SQLite persistence for the sale/receivables ledger, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Warung POS Data Flow                              │
//! │                                                                         │
//! │  warung-engine (SaleEngine, ReceivablesLedger, AggregationEngine)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    warung-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │   │  catalog       │   │  (embedded)  │   │   │
//! │  │   │               │   │  customer      │   │              │   │   │
//! │  │   │ SqlitePool    │◄──│  sale          │   │ 001_initial_ │   │   │
//! │  │   │ WAL, FK on    │   │  receivable    │   │ schema.sql   │   │   │
//! │  │   │               │   │  report        │   │              │   │   │
//! │  │   └───────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                        SQLite database file                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warung_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./warung.db")).await?;
//! let unpaid = db.receivables().list_outstanding().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::receivable::{
    OutstandingSale, PaymentApplication, PaymentReceipt, ReceivableRepository,
};
pub use repository::report::{ReportLine, ReportRepository, ReportSale};
pub use repository::sale::SaleRepository;
