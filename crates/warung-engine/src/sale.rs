//! # Sale Engine
//!
//! Records a checkout as one atomic multi-row write.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale(request)                                 │
//! │                                                                         │
//! │  validate lines / customer  ──► EmptyCart, MissingCustomerForCredit    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total = Σ quantity * price_at_sale                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cash  → remaining 0, Paid        credit → remaining total, Unpaid     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  header + all lines in ONE transaction (rollback on any failure)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bump view invalidation, return the new sale id                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices and stock arrive as the caller snapshotted them; this engine does
//! not re-validate against the live catalog.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::signal::ViewRefresh;
use warung_core::checkout::{initial_settlement, CheckoutRequest};
use warung_core::{Sale, SaleLineItem};
use warung_db::Database;

/// Records checkouts.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    db: Database,
    views: ViewRefresh,
}

impl SaleEngine {
    pub fn new(db: Database, views: ViewRefresh) -> Self {
        SaleEngine { db, views }
    }

    /// Records a sale and returns its id.
    ///
    /// Either the header and every line item land together, or nothing
    /// from this call remains visible.
    pub async fn record_sale(&self, request: &CheckoutRequest) -> EngineResult<String> {
        let total = request.total()?;

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let (payment_status, remaining) = initial_settlement(request.payment_method, total);

        debug!(
            sale_id = %sale_id,
            method = ?request.payment_method,
            lines = request.lines.len(),
            "Recording checkout"
        );

        let sale = Sale {
            id: sale_id.clone(),
            customer_id: request.customer_id.clone(),
            total_amount: total.rupiah(),
            payment_method: request.payment_method,
            payment_status,
            remaining_amount: remaining.rupiah(),
            created_at: now,
            updated_at: now,
        };

        let items: Vec<SaleLineItem> = request
            .lines
            .iter()
            .map(|line| SaleLineItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                price_at_sale: line.price_at_sale,
                line_total: line.total().rupiah(),
                created_at: now,
            })
            .collect();

        self.db.sales().create_with_items(&sale, &items).await?;

        self.views.notify();

        info!(sale_id = %sale_id, total = %total, items = items.len(), "Sale recorded");

        Ok(sale_id)
    }

    /// Reads a sale back with its line items.
    pub async fn sale_details(&self, sale_id: &str) -> EngineResult<(Sale, Vec<SaleLineItem>)> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| EngineError::SaleNotFound(sale_id.to_string()))?;
        let items = self.db.sales().items_for(sale_id).await?;

        Ok((sale, items))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use warung_core::checkout::CartLine;
    use warung_core::{Customer, PaymentMethod, PaymentStatus, Product, ValidationError};
    use warung_db::DbConfig;

    async fn engine_with_fixtures() -> (SaleEngine, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        for (id, name, sale_price, cost_price) in [
            ("p-1", "Indomie Goreng", 10_000, 8_000),
            ("p-2", "Teh Botol Sosro 350ml", 5_000, 3_900),
        ] {
            db.catalog()
                .upsert(&Product {
                    id: id.into(),
                    name: name.into(),
                    sale_price,
                    cost_price,
                    stock_qty: 50,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        db.customers()
            .insert(&Customer {
                id: "c-1".into(),
                name: "Bu Sari".into(),
                phone: None,
                address: None,
                created_at: now,
            })
            .await
            .unwrap();

        (SaleEngine::new(db.clone(), ViewRefresh::new()), db)
    }

    fn line(product_id: &str, quantity: i64, price_at_sale: i64) -> CartLine {
        CartLine {
            product_id: product_id.into(),
            quantity,
            price_at_sale,
        }
    }

    #[tokio::test]
    async fn test_cash_sale_is_born_settled() {
        let (engine, _db) = engine_with_fixtures().await;

        let sale_id = engine
            .record_sale(&CheckoutRequest {
                lines: vec![line("p-1", 2, 10_000), line("p-2", 1, 5_000)],
                payment_method: PaymentMethod::Cash,
                customer_id: None,
            })
            .await
            .unwrap();

        let (sale, items) = engine.sale_details(&sale_id).await.unwrap();
        assert_eq!(sale.total_amount, 25_000);
        assert_eq!(sale.remaining_amount, 0);
        assert_eq!(sale.payment_status, PaymentStatus::Paid);
        assert_eq!(items.len(), 2);
        assert_eq!(
            sale.total_amount,
            items.iter().map(|i| i.line_total).sum::<i64>()
        );
    }

    #[tokio::test]
    async fn test_credit_sale_is_born_owing() {
        let (engine, _db) = engine_with_fixtures().await;

        let sale_id = engine
            .record_sale(&CheckoutRequest {
                lines: vec![line("p-1", 3, 10_000)],
                payment_method: PaymentMethod::Credit,
                customer_id: Some("c-1".into()),
            })
            .await
            .unwrap();

        let (sale, _) = engine.sale_details(&sale_id).await.unwrap();
        assert_eq!(sale.total_amount, 30_000);
        assert_eq!(sale.remaining_amount, 30_000);
        assert_eq!(sale.payment_status, PaymentStatus::Unpaid);
        assert_eq!(sale.customer_id.as_deref(), Some("c-1"));
    }

    #[tokio::test]
    async fn test_validation_failures() {
        let (engine, _db) = engine_with_fixtures().await;

        let empty = engine
            .record_sale(&CheckoutRequest {
                lines: vec![],
                payment_method: PaymentMethod::Cash,
                customer_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            empty,
            EngineError::Validation(ValidationError::EmptyCart)
        ));

        let anonymous_credit = engine
            .record_sale(&CheckoutRequest {
                lines: vec![line("p-1", 1, 10_000)],
                payment_method: PaymentMethod::Credit,
                customer_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            anonymous_credit,
            EngineError::Validation(ValidationError::MissingCustomerForCredit)
        ));
    }

    #[tokio::test]
    async fn test_failed_checkout_leaves_no_orphan_header() {
        let (engine, db) = engine_with_fixtures().await;

        let err = engine
            .record_sale(&CheckoutRequest {
                lines: vec![line("p-1", 1, 10_000), line("p-missing", 1, 2_000)],
                payment_method: PaymentMethod::Cash,
                customer_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Persistence(_)));

        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_successful_sale_invalidates_views() {
        let (engine, _db) = engine_with_fixtures().await;
        let views = engine.views.clone();
        assert_eq!(views.generation(), 0);

        engine
            .record_sale(&CheckoutRequest {
                lines: vec![line("p-2", 1, 5_000)],
                payment_method: PaymentMethod::Cash,
                customer_id: None,
            })
            .await
            .unwrap();

        assert_eq!(views.generation(), 1);
    }
}
