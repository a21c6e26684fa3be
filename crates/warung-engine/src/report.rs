//! # Aggregation Engine
//!
//! Read-only reporting over the sale / line-item / payment history.
//!
//! ## Two Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  daily_summary(date)                                                    │
//! │    sales_total      = cash sales that day                               │
//! │                     + installments RECEIVED that day                    │
//! │                       (money counts on the day it arrives, not the     │
//! │                        day the credit sale was made)                    │
//! │    outstanding_total = Σ remaining over unpaid sales, global           │
//! │                                                                         │
//! │  filtered_report(start?, end?)                                          │
//! │    lists every sale in range, newest first                              │
//! │    unpaid credit sales are LISTED but EXCLUDED from omset/profit:      │
//! │    unrealized revenue does not count until it is collected             │
//! │    profit = Σ (price_at_sale − current cost_price) * quantity          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::EngineResult;
use warung_db::{Database, ReportSale};

// =============================================================================
// Report Types
// =============================================================================

/// The dashboard headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    /// Cash takings plus installments received on the day.
    pub sales_total: i64,
    /// Global unpaid balance, not scoped to the day.
    pub outstanding_total: i64,
}

/// Date-filtered transaction listing with realized totals.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredReport {
    /// Every sale in range, including unpaid credit sales (marked by their
    /// own status fields).
    pub transactions: Vec<ReportSale>,
    /// Gross revenue over realized sales in range.
    pub omset: i64,
    /// Profit over realized sales in range, against current catalog cost.
    pub profit: i64,
}

impl FilteredReport {
    /// Profit as a percentage of omset. Zero when there is no omset.
    pub fn margin_percent(&self) -> f64 {
        if self.omset > 0 {
            self.profit as f64 / self.omset as f64 * 100.0
        } else {
            0.0
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Computes reports. Read-only: holds no invalidation handle because it
/// never writes.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    db: Database,
}

impl AggregationEngine {
    pub fn new(db: Database) -> Self {
        AggregationEngine { db }
    }

    /// Headline numbers for one calendar day (UTC).
    pub async fn daily_summary(&self, date: NaiveDate) -> EngineResult<DailySummary> {
        let (start, end) = day_bounds(date);
        let reports = self.db.reports();

        let cash = reports.cash_sales_total(start, end).await?;
        let installments = reports.installments_received(start, end).await?;
        let outstanding = reports.outstanding_total().await?;

        Ok(DailySummary {
            sales_total: cash + installments,
            outstanding_total: outstanding,
        })
    }

    /// Transaction listing over an inclusive date range, with realized
    /// omset and profit.
    pub async fn filtered_report(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> EngineResult<FilteredReport> {
        let start = start_date.map(day_start);
        let end = end_date.map(next_day_start);

        let transactions = self.db.reports().sales_with_lines(start, end).await?;

        let mut omset = 0i64;
        let mut profit = 0i64;
        for transaction in &transactions {
            if transaction.sale.is_unrealized() {
                continue;
            }
            omset += transaction.sale.total_amount;
            profit += transaction.lines.iter().map(|line| line.profit()).sum::<i64>();
        }

        Ok(FilteredReport {
            transactions,
            omset,
            profit,
        })
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn next_day_start(date: NaiveDate) -> DateTime<Utc> {
    day_start(date.succ_opt().unwrap_or(NaiveDate::MAX))
}

fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (day_start(date), next_day_start(date))
}

// =============================================================================
// Unit Tests
// =============================================================================
