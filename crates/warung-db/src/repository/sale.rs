//! # Sale Repository
//!
//! Atomic checkout writes and sale readbacks.
//!
//! ## The One Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Write Path                                  │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT sales (header)                                                │
//! │    INSERT sale_items (line 1)                                           │
//! │    INSERT sale_items (line 2)                                           │
//! │    ...                                                                  │
//! │  COMMIT        ← all rows land together                                 │
//! │                                                                         │
//! │  Any failure (bad FK, disk, constraint) aborts the transaction and     │
//! │  NOTHING from the call stays visible. A sale header without its        │
//! │  lines would corrupt every report that joins them; it cannot exist.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use warung_core::{Sale, SaleLineItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a sale header and all of its line items in one transaction.
    ///
    /// Dropping the transaction on any error rolls back every row written
    /// so far, so a failed checkout leaves no orphan header behind.
    pub async fn create_with_items(&self, sale: &Sale, items: &[SaleLineItem]) -> DbResult<()> {
        debug!(id = %sale.id, total = sale.total_amount, items = items.len(), "Recording sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_id, total_amount, payment_method, payment_status,
                remaining_amount, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(sale.total_amount)
        .bind(sale.payment_method)
        .bind(sale.payment_status)
        .bind(sale.remaining_amount)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, quantity, price_at_sale,
                    line_total, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.price_at_sale)
            .bind(item.line_total)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, total_amount, payment_method, payment_status,
                   remaining_amount, created_at, updated_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale, insertion order.
    pub async fn items_for(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, price_at_sale,
                   line_total, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts sale headers. Used by tests to prove rollbacks left nothing.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use warung_core::{PaymentMethod, PaymentStatus, Product, Sale, SaleLineItem};

    async fn db_with_product(id: &str, sale_price: i64) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.catalog()
            .upsert(&Product {
                id: id.into(),
                name: "Indomie Goreng".into(),
                sale_price,
                cost_price: sale_price - 700,
                stock_qty: 40,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    fn cash_sale(id: &str, total: i64) -> Sale {
        let now = Utc::now();
        Sale {
            id: id.into(),
            customer_id: None,
            total_amount: total,
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Paid,
            remaining_amount: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(id: &str, sale_id: &str, product_id: &str, qty: i64, price: i64) -> SaleLineItem {
        SaleLineItem {
            id: id.into(),
            sale_id: sale_id.into(),
            product_id: product_id.into(),
            quantity: qty,
            price_at_sale: price,
            line_total: qty * price,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let db = db_with_product("p-1", 3_500).await;

        let sale = cash_sale("s-1", 7_000);
        let items = vec![line("li-1", "s-1", "p-1", 2, 3_500)];
        db.sales().create_with_items(&sale, &items).await.unwrap();

        let found = db.sales().get_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(found.total_amount, 7_000);
        assert_eq!(found.payment_method, PaymentMethod::Cash);
        assert_eq!(found.payment_status, PaymentStatus::Paid);
        assert_eq!(found.remaining_amount, 0);

        let items = db.sales().items_for("s-1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line_total, 7_000);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_header() {
        let db = db_with_product("p-1", 3_500).await;

        // Second line references a product that does not exist; the FK
        // failure must take the header down with it.
        let sale = cash_sale("s-1", 10_500);
        let items = vec![
            line("li-1", "s-1", "p-1", 2, 3_500),
            line("li-2", "s-1", "p-missing", 1, 3_500),
        ];

        let err = db.sales().create_with_items(&sale, &items).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert!(db.sales().get_by_id("s-1").await.unwrap().is_none());
        assert!(db.sales().items_for("s-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_header_rejected() {
        let db = db_with_product("p-1", 3_500).await;

        let sale = cash_sale("s-1", 3_500);
        let items = vec![line("li-1", "s-1", "p-1", 1, 3_500)];
        db.sales().create_with_items(&sale, &items).await.unwrap();

        let dup_items = vec![line("li-2", "s-1", "p-1", 1, 3_500)];
        let err = db
            .sales()
            .create_with_items(&sale, &dup_items)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The original row is untouched and no stray line landed.
        assert_eq!(db.sales().count().await.unwrap(), 1);
        assert_eq!(db.sales().items_for("s-1").await.unwrap().len(), 1);
    }
}
