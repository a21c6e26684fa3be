//! # warung-engine: Service Layer for Warung POS
//!
//! The three ledger components, wired over [`warung_core`] (pure rules) and
//! [`warung_db`] (SQLite persistence):
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        warung-engine                                    │
//! │                                                                         │
//! │   Catalog ──► SaleEngine ──► sales + sale_items (one transaction)      │
//! │   (read)          │                                                     │
//! │                   ▼                                                     │
//! │            ReceivablesLedger ──► payment_events + settled header       │
//! │                   │              (compare-and-swap, bounded retry)      │
//! │                   ▼                                                     │
//! │            AggregationEngine ──► daily summary, filtered profit         │
//! │                   ▲              (read-only joins)                      │
//! │                   │                                                     │
//! │            ViewRefresh ◄──────── bumped after every successful write   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warung_db::DbConfig;
//! use warung_engine::Warung;
//!
//! let warung = Warung::open(DbConfig::new("./warung.db")).await?;
//!
//! let sale_id = warung.sales.record_sale(&checkout).await?;
//! let receipt = warung.receivables.record_payment(&sale_id, 40_000).await?;
//! let today = warung.reports.daily_summary(date).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod receivable;
pub mod report;
pub mod response;
pub mod sale;
pub mod signal;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use receivable::ReceivablesLedger;
pub use report::{AggregationEngine, DailySummary, FilteredReport};
pub use response::ApiResponse;
pub use sale::SaleEngine;
pub use signal::ViewRefresh;

use warung_db::{CatalogRepository, CustomerRepository, Database, DbConfig, DbResult};

// =============================================================================
// Facade
// =============================================================================

/// Everything a till needs, sharing one database and one invalidation
/// signal.
#[derive(Debug, Clone)]
pub struct Warung {
    pub sales: SaleEngine,
    pub receivables: ReceivablesLedger,
    pub reports: AggregationEngine,
    db: Database,
    views: ViewRefresh,
}

impl Warung {
    /// Opens the database (running migrations) and assembles the engines.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;
        Ok(Warung::with_database(db))
    }

    /// Assembles the engines over an already-open database.
    pub fn with_database(db: Database) -> Self {
        let views = ViewRefresh::new();
        Warung {
            sales: SaleEngine::new(db.clone(), views.clone()),
            receivables: ReceivablesLedger::new(db.clone(), views.clone()),
            reports: AggregationEngine::new(db.clone()),
            db,
            views,
        }
    }

    /// Read-side catalog access (sale price, cost price, stock on hand).
    /// The catalog itself is owned and mutated elsewhere.
    pub fn catalog(&self) -> CatalogRepository {
        self.db.catalog()
    }

    /// The customer directory backing credit sales.
    pub fn customers(&self) -> CustomerRepository {
        self.db.customers()
    }

    /// Subscribe to cached-view invalidation.
    ///
    /// The receiver observes a generation counter that moves after every
    /// successful sale or payment write; any cached aggregate older than
    /// the current generation is stale.
    pub fn subscribe_views(&self) -> tokio::sync::watch::Receiver<u64> {
        self.views.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
