//! # Report Repository
//!
//! Read-only aggregation queries over sales, line items, products and
//! payment events.
//!
//! Two kinds of reads live here:
//! - scalar sums feeding the daily dashboard (cash takings, installments
//!   received, global outstanding balance)
//! - the joined transaction listing behind the filtered profit report,
//!   where each line carries the frozen `price_at_sale` next to the
//!   product's *current* `cost_price`

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::error::DbResult;
use warung_core::Sale;

// =============================================================================
// Row Types
// =============================================================================

/// One sale line as the profit report sees it.
///
/// `price_at_sale` is the checkout snapshot; `cost_price` is read live from
/// the catalog at query time, so later cost edits shift reported profit.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_sale: i64,
    pub cost_price: i64,
}

impl ReportLine {
    /// Revenue contributed by this line.
    #[inline]
    pub fn line_total(&self) -> i64 {
        self.quantity * self.price_at_sale
    }

    /// Profit contributed by this line, against current cost.
    #[inline]
    pub fn profit(&self) -> i64 {
        (self.price_at_sale - self.cost_price) * self.quantity
    }
}

/// A sale with everything the report table shows.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSale {
    pub sale: Sale,
    pub customer_name: Option<String>,
    pub lines: Vec<ReportLine>,
}

#[derive(Debug, FromRow)]
struct ReportRow {
    #[sqlx(flatten)]
    sale: Sale,
    customer_name: Option<String>,
    product_id: String,
    product_name: String,
    quantity: i64,
    price_at_sale: i64,
    cost_price: i64,
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sales in range (newest first), each with customer name and line
    /// details joined against the live catalog.
    ///
    /// Bounds are half-open: `start <= created_at < end`. Either side may
    /// be absent for an unbounded listing.
    pub async fn sales_with_lines(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<ReportSale>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT s.id, s.customer_id, s.total_amount, s.payment_method,
                   s.payment_status, s.remaining_amount, s.created_at, s.updated_at,
                   c.name AS customer_name,
                   li.product_id, p.name AS product_name, li.quantity,
                   li.price_at_sale, p.cost_price
            FROM sales s
            JOIN sale_items li ON li.sale_id = s.id
            JOIN products p ON p.id = li.product_id
            LEFT JOIN customers c ON c.id = s.customer_id
            "#,
        );

        let mut prefix = " WHERE ";
        if let Some(start) = start {
            builder.push(prefix).push("s.created_at >= ").push_bind(start);
            prefix = " AND ";
        }
        if let Some(end) = end {
            builder.push(prefix).push("s.created_at < ").push_bind(end);
        }
        builder.push(" ORDER BY s.created_at DESC, s.id, li.created_at, li.id");

        let rows: Vec<ReportRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        // Rows arrive sale-contiguous; fold them into one entry per sale.
        let mut sales: Vec<ReportSale> = Vec::new();
        for row in rows {
            let line = ReportLine {
                product_id: row.product_id,
                product_name: row.product_name,
                quantity: row.quantity,
                price_at_sale: row.price_at_sale,
                cost_price: row.cost_price,
            };

            match sales.last_mut() {
                Some(last) if last.sale.id == row.sale.id => last.lines.push(line),
                _ => sales.push(ReportSale {
                    sale: row.sale,
                    customer_name: row.customer_name,
                    lines: vec![line],
                }),
            }
        }

        Ok(sales)
    }

    /// Sum of cash sales' totals with `start <= created_at < end`.
    pub async fn cash_sales_total(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_amount)
            FROM sales
            WHERE payment_method = 'cash' AND created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// Sum of installments received with `start <= created_at < end`.
    ///
    /// Counts money on the day it arrived, not the day the originating
    /// credit sale was made.
    pub async fn installments_received(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount)
            FROM payment_events
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// Global outstanding balance over all unpaid sales. Not date-scoped.
    pub async fn outstanding_total(&self) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(remaining_amount) FROM sales WHERE payment_status = 'unpaid'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
